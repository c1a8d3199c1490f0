//! 分发器公共API测试

use psi_classifier::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 记录调用次数与方向的分类器
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
    server_side: Arc<AtomicUsize>,
}

impl Classifier for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn try_classify(&self, _session: &mut dyn Session, _data: &[u8], direction: Direction) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if direction == Direction::ServerToClient {
            self.server_side.fetch_add(1, Ordering::SeqCst);
        }
        false
    }
}

#[test]
fn test_shared_classifier_across_transports() {
    let recorder = Recorder::default();
    let registry = RegistryBuilder::new()
        .register_transports(
            "probe",
            &[Transport::Tcp, Transport::Udp],
            0,
            b"PRB",
            Arc::new(recorder.clone()),
        )
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(&registry);

    let mut tcp = FlowSession::tcp(1000, 2000);
    let mut udp = FlowSession::udp(1000, 2000);
    dispatcher.classify(&mut tcp, b"PRB1", Direction::ClientToServer);
    dispatcher.classify(&mut udp, b"PRB1", Direction::ServerToClient);
    dispatcher.classify(&mut udp, b"PR", Direction::ServerToClient);

    assert_eq!(recorder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(recorder.server_side.load(Ordering::SeqCst), 1);
}

#[test]
fn test_pattern_at_offset_is_exact() {
    let registry = RegistryBuilder::new()
        .register("memcached", Transport::Udp, 6, b"\x00\x00stats", TagProtocol::new("memcached"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(&registry);

    let mut session = FlowSession::udp(50000, 11211);
    dispatcher.classify(&mut session, b"\x00\x01\x00\x00\x00\x01\x00\x00STATS\r\n", Direction::ClientToServer);
    assert!(session.is_unclassified());

    dispatcher.classify(&mut session, b"\x00\x01\x00\x00\x00\x01\x00\x00stats\r\n", Direction::ClientToServer);
    assert!(session.has_protocol("memcached"));
}

#[test]
fn test_port_roles() {
    let recorder = Recorder::default();
    let registry = RegistryBuilder::new()
        .register_port("src", PortSelector::tcp_src(7000), recorder.clone())
        .register_port("either", PortSelector::tcp(7001), TagProtocol::new("either"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(&registry);

    let mut session = FlowSession::tcp(7000, 7001);
    let outcome = dispatcher.classify(&mut session, b"", Direction::ClientToServer);
    assert_eq!(outcome.fired, 2);
    assert_eq!(outcome.confirmed, vec!["either"]);

    let mut session = FlowSession::tcp(7001, 7000);
    let outcome = dispatcher.classify(&mut session, b"", Direction::ClientToServer);
    assert_eq!(outcome.fired, 1);
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);

    let mut session = FlowSession::udp(7000, 7001);
    let outcome = dispatcher.classify(&mut session, b"", Direction::ClientToServer);
    assert_eq!(outcome.fired, 0);
}

#[test]
fn test_stats_accumulate_on_caller_side() {
    let registry = RegistryBuilder::new()
        .register("zabbix", Transport::Tcp, 0, b"ZBXD\x01", TagProtocol::new("zabbix"))
        .register("pop3", Transport::Tcp, 0, b"+OK ", TagProtocol::new("pop3"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(&registry);
    let mut stats = ClassifyStats::new();

    for payload in [&b"ZBXD\x01\x00"[..], b"ZBXD\x01\x01", b"+OK hello", b"GET / HTTP/1.1"] {
        let mut session = FlowSession::tcp(50000, 10051);
        stats.record(&dispatcher.classify(&mut session, payload, Direction::ClientToServer));
    }

    assert_eq!(stats.total_calls, 4);
    assert_eq!(stats.classified_calls, 3);
    assert_eq!(stats.most_common(), Some("zabbix"));
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
}

#[test]
fn test_unknown_config_names_are_ignored() {
    let config = RegistryConfig::new().disable_protocol("does-not-exist");
    let registry = RegistryBuilder::new()
        .with_config(config)
        .register("pop3", Transport::Tcp, 0, b"+OK ", TagProtocol::new("pop3"))
        .build()
        .unwrap();
    assert_eq!(registry.len(), 1);
}
