//! 注册表跨线程共享测试

#![cfg(feature = "builtin")]

use psi_classifier::*;
use rayon::prelude::*;
use std::sync::Arc;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_registry_is_send_sync() {
    assert_send_sync::<SignatureRegistry>();
    assert_send_sync::<Dispatcher<'static>>();
}

#[test]
fn test_parallel_sessions_share_registry() {
    let registry = Arc::new(SignatureRegistry::builtin().unwrap());
    let mut ntp = vec![0u8; 48];
    ntp[0] = 0x23;
    ntp[1] = 0x02;

    let sessions: Vec<FlowSession> = (0..2000u16)
        .into_par_iter()
        .map(|i| {
            let dispatcher = Dispatcher::new(&registry);
            if i % 2 == 0 {
                let mut session = FlowSession::udp(40000 + i, 123);
                dispatcher.classify(&mut session, &ntp, Direction::ClientToServer);
                session
            } else {
                let mut session = FlowSession::tcp(40000 + i, 6379);
                dispatcher.classify(&mut session, b"+PONG\r\n", Direction::ServerToClient);
                session
            }
        })
        .collect();

    for (i, session) in sessions.iter().enumerate() {
        let expected = if i % 2 == 0 { "ntp" } else { "redis" };
        assert_eq!(session.protocols().collect::<Vec<_>>(), vec![expected]);
    }
}

#[test]
fn test_parallel_stats_merge() {
    let registry = SignatureRegistry::builtin().unwrap();
    let payloads: Vec<&[u8]> = vec![b"SIP/2.0 200 OK\r\n", b"BJNP\x01\x02", b"garbage"];

    let confirmed: usize = (0..300usize)
        .into_par_iter()
        .map(|i| {
            let mut session = FlowSession::udp(5060, 5060);
            let outcome = Dispatcher::new(&registry).classify(
                &mut session,
                payloads[i % payloads.len()],
                Direction::ClientToServer,
            );
            outcome.confirmed.len()
        })
        .sum();

    assert_eq!(confirmed, 200);
}
