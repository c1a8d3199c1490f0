//! 内置协议特征表
//!
//! 同一协议的多个备选前缀共享一个分类器实例，只会产生一个标签。

use crate::builder::RegistryBuilder;
use crate::classifiers::{
    ArubaPapiClassifier, Banner220Classifier, DropboxLanSyncClassifier, FlapClassifier,
    Gh0stClassifier, HdfsClassifier, HsrpClassifier, ImapClassifier, IsakmpClassifier,
    JabberClassifier, KafkaClassifier, MqttClassifier, NtpClassifier, PortConfirm, RdpClassifier,
    SccpClassifier, SnmpClassifier, StunClassifier, StunRspClassifier, SyslogClassifier,
    ThriftClassifier, UserLoginClassifier, VncClassifier,
};
use crate::core::classifier::{Classifier, TagProtocol};
use crate::core::session::Transport;
use crate::core::signature::PortSelector;
use std::sync::Arc;

const TCP: &[Transport] = &[Transport::Tcp];
const UDP: &[Transport] = &[Transport::Udp];
const BOTH: &[Transport] = &[Transport::Tcp, Transport::Udp];

/// 一组备选前缀登记到同一个分类器
fn alternatives(
    mut builder: RegistryBuilder,
    name: &str,
    transports: &[Transport],
    offset: usize,
    patterns: &[&[u8]],
    classifier: Arc<dyn Classifier>,
) -> RegistryBuilder {
    for pattern in patterns {
        builder = builder.register_transports(name, transports, offset, pattern, classifier.clone());
    }
    builder
}

/// 匹配即打标签的一组前缀
fn tagged(
    builder: RegistryBuilder,
    name: &str,
    tag: &str,
    transports: &[Transport],
    offset: usize,
    patterns: &[&[u8]],
) -> RegistryBuilder {
    alternatives(builder, name, transports, offset, patterns, Arc::new(TagProtocol::new(tag)))
}

/// P2P与加密货币
fn register_p2p(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = tagged(builder, "bt", "bittorrent", TCP, 0, &[b"\x13BitTorrent protocol", b"BSYNC\x00"]);
    let builder = tagged(builder, "bt", "bittorrent", UDP, 0, &[b"d1:a", b"d1:r", b"d1:q"]);
    tagged(builder, "bitcoin", "bitcoin", TCP, 0, &[b"\xf9\xbe\xb4\xd9", b"\xf9\xbe\xb4\xfe"])
}

/// 远程访问、邮件与消息
fn register_remote_and_mail(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = builder
        .register("rdp", Transport::Tcp, 0, b"\x03\x00", RdpClassifier)
        .register("imap", Transport::Tcp, 0, b"* OK ", ImapClassifier)
        .register("pop3", Transport::Tcp, 0, b"+OK ", TagProtocol::new("pop3"))
        .register("gh0st", Transport::Tcp, 13, b"\x78", Gh0stClassifier)
        .register("other220", Transport::Tcp, 0, b"220 ", Banner220Classifier)
        .register("vnc", Transport::Tcp, 0, b"RFB 0", VncClassifier)
        .register("jabber", Transport::Tcp, 0, b"<?xml", JabberClassifier)
        .register("user", Transport::Tcp, 0, b"USER ", UserLoginClassifier)
        .register("flap", Transport::Tcp, 0, b"\x2a\x01", FlapClassifier)
        .register("mqtt", Transport::Tcp, 0, b"\x10", MqttClassifier);

    let builder = tagged(builder, "sip", "sip", BOTH, 0, &[b"SIP/2.0", b"REGISTER sip:", b"NOTIFY sip:"]);
    let builder = tagged(builder, "nsclient", "nsclient", TCP, 0, &[b"NSClient", b"None&"]);
    let builder = tagged(builder, "ssdp", "ssdp", UDP, 0, &[b"M-SEARCH ", b"NOTIFY * "]);
    tagged(builder, "x11", "x11", TCP, 0, &[b"\x6c\x00\x0b\x00"])
}

/// 数据库、缓存与大数据
fn register_datastores(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = tagged(
        builder,
        "redis",
        "redis",
        TCP,
        0,
        &[
            b"+PONG",
            b"\x2a\x31\x0d\x0a\x24",
            b"\x2a\x32\x0d\x0a\x24",
            b"\x2a\x33\x0d\x0a\x24",
            b"\x2a\x34\x0d\x0a\x24",
            b"\x2a\x35\x0d\x0a\x24",
            b"-NOAUTH ",
        ],
    );
    let builder = tagged(
        builder,
        "mongo",
        "mongo",
        TCP,
        8,
        &[b"\x00\x00\x00\x00\xd4\x07\x00\x00", b"\xff\xff\xff\xff\xd4\x07\x00\x00"],
    );
    let builder = tagged(
        builder,
        "aerospike",
        "aerospike",
        TCP,
        0,
        &[
            b"\x02\x01\x00\x00\x00\x00\x00\x4enode",
            b"\x02\x01\x00\x00\x00\x00\x00\x23node",
        ],
    );
    let builder = tagged(
        builder,
        "cassandra",
        "cassandra",
        TCP,
        0,
        &[
            b"\x00\x00\x00\x25\x80\x01\x00\x01\x00\x00\x00\x0cset_",
            b"\x00\x00\x00\x1d\x80\x01\x00\x01\x00\x00\x00\x10desc",
        ],
    );
    let builder = tagged(builder, "memcached", "memcached", TCP, 0, &[b"flush_all", b"STORED\r\n", b"END\r\n"]);
    let builder = tagged(builder, "memcached", "memcached", UDP, 6, &[b"\x00\x00stats", b"\x00\x00gets "]);
    let builder = tagged(builder, "nzsql", "nzsql", TCP, 0, &[b"\x00\x00\x00\x08\x00\x01\x00\x03"]);
    let builder = tagged(builder, "hbase", "hbase", TCP, 0, &[b"HBas\x00"]);
    let builder = tagged(builder, "hadoop", "hadoop", TCP, 0, &[b"hrpc\x09"]);
    let builder = tagged(
        builder,
        "zookeeper",
        "zookeeper",
        TCP,
        0,
        &[b"mntr\n", b"\x00\x00\x00\x2c\x00\x00\x00\x00", b"\x00\x00\x00\x2d\x00\x00\x00\x00"],
    );
    let builder = tagged(builder, "elasticsearch", "elasticsearch", TCP, 0, &[b"ES\x00\x00"]);
    let builder = tagged(builder, "thrift", "thrift", TCP, 0, &[b"\x80\x01\x00\x01\x00\x00\x00"]);

    let builder = builder
        .register("thrift", Transport::Tcp, 0, b"\x00\x00", ThriftClassifier)
        .register("kafka", Transport::Tcp, 0, b"\x00\x00", KafkaClassifier);
    alternatives(
        builder,
        "hdfs",
        TCP,
        0,
        &[b"\x00\x1c\x50", b"\x00\x1c\x51", b"\x00\x1c\x55"],
        Arc::new(HdfsClassifier),
    )
}

/// 网络基础设施
fn register_infrastructure(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = alternatives(
        builder,
        "ntp",
        UDP,
        0,
        &[
            b"\x13", b"\x19", b"\x1a", b"\x1b", b"\x1c", b"\x21", b"\x23", b"\x24", b"\xd9", b"\xdb",
            b"\xe3",
        ],
        Arc::new(NtpClassifier),
    );
    let builder = builder.register("snmp", Transport::Udp, 0, b"\x30", SnmpClassifier);
    let builder = alternatives(
        builder,
        "syslog",
        BOTH,
        0,
        &[b"<1", b"<2", b"<3", b"<4", b"<5", b"<6", b"<7", b"<8", b"<9"],
        Arc::new(SyslogClassifier),
    );
    let builder = builder.register_both("stun", 0, b"RSP/", StunRspClassifier);
    let builder = alternatives(
        builder,
        "stun",
        UDP,
        0,
        &[b"\x00\x01\x00", b"\x00\x03\x00", b"\x01\x01\x00"],
        Arc::new(StunClassifier),
    );
    let builder = alternatives(
        builder,
        "tacacs",
        BOTH,
        0,
        &[
            b"\xc0\x01\x01",
            b"\xc0\x01\x02",
            b"\xc0\x02\x01",
            b"\xc0\x03\x01",
            b"\xc0\x03\x02",
            b"\xc1\x01\x01",
            b"\xc1\x01\x02",
        ],
        Arc::new(PortConfirm::new("tacacs", 49)),
    );
    let builder = alternatives(
        builder,
        "rip",
        UDP,
        0,
        &[b"\x01\x01\x00\x00", b"\x01\x02\x00\x00", b"\x02\x01\x00\x00", b"\x02\x02\x00\x00"],
        Arc::new(PortConfirm::new("rip", 520)),
    );
    let builder = tagged(builder, "dcerpc", "dcerpc", TCP, 0, &[b"\x05\x00\x0b"]);

    builder
        .register_port("isakmp", PortSelector::udp(500), IsakmpClassifier)
        .register_port("isakmp", PortSelector::udp(4500), IsakmpClassifier)
        .register_port("aruba-papi", PortSelector::udp(8211), ArubaPapiClassifier)
        .register_port("hsrp", PortSelector::udp(1985), HsrpClassifier)
        .register_port("hsrp", PortSelector::udp(2029), HsrpClassifier)
}

/// 应用、游戏与设备
fn register_applications(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = tagged(builder, "bjnp", "bjnp", UDP, 0, &[b"BJNP"]);
    let builder = tagged(builder, "zabbix", "zabbix", TCP, 0, &[b"ZBXD\x01"]);
    let builder = tagged(builder, "rmi", "rmi", TCP, 0, &[b"JRMI\x00\x02\x4b"]);
    let builder = tagged(builder, "flash-policy", "flash-policy", TCP, 0, &[b"<policy-file-request/>"]);
    let builder = tagged(builder, "steam-friends", "steam-friends", UDP, 0, &[b"VS01"]);
    let builder = tagged(builder, "valve-a2s", "valve-a2s", UDP, 0, &[b"\xff\xff\xff\xffTSou"]);
    let builder = tagged(builder, "steam-ihscp", "steam-ihscp", TCP, 0, &[b"\xa4\x00\x00\x00VT01"]);
    let builder = tagged(builder, "honeywell-tcc", "honeywell-tcc", TCP, 0, &[b"CBKPPR\x05P"]);
    let builder = tagged(builder, "pjl", "pjl", TCP, 0, &[b"\x1b%-12345", b"@PJL "]);
    let builder = tagged(builder, "splunk", "splunk", TCP, 0, &[b"--splunk-cooked-mode"]);

    builder
        .register_port("dropbox-lan-sync", PortSelector::udp(17500), DropboxLanSyncClassifier)
        .register_port("sccp", PortSelector::tcp_dst(2000), SccpClassifier)
}

/// 登记全部内置特征
pub fn register_builtin(builder: RegistryBuilder) -> RegistryBuilder {
    let before = builder.pending();
    let builder = register_p2p(builder);
    let builder = register_remote_and_mail(builder);
    let builder = register_datastores(builder);
    let builder = register_infrastructure(builder);
    let builder = register_applications(builder);

    crate::psi_debug!("📋 [内置特征] 登记 {} 条特征", builder.pending() - before);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_builds() {
        let registry = register_builtin(RegistryBuilder::new()).build().unwrap();
        let names = registry.names();

        for name in ["bt", "rdp", "ntp", "snmp", "mqtt", "hsrp", "sccp", "tacacs", "steam-ihscp"] {
            assert!(names.contains(name), "missing {}", name);
        }
        assert_eq!(registry.entries_named("syslog").count(), 18);
        assert_eq!(registry.entries_named("ntp").count(), 11);
        assert_eq!(registry.entries_named("redis").count(), 7);
    }

    #[test]
    fn test_port_keyed_entries() {
        let registry = register_builtin(RegistryBuilder::new()).build().unwrap();
        let ports: Vec<&str> = registry
            .entries()
            .iter()
            .filter(|entry| entry.is_port_keyed())
            .map(|entry| entry.name())
            .collect();

        assert_eq!(
            ports,
            vec!["isakmp", "isakmp", "aruba-papi", "hsrp", "hsrp", "dropbox-lan-sync", "sccp"]
        );
    }
}
