//! 端口确认类分类器
//!
//! 前缀过短或根本没有前缀的协议，通过众所周知端口加少量数值校验确认。

use crate::core::classifier::Classifier;
use crate::core::session::{Direction, Session};

/// 任一端口等于给定端口即打标签
///
/// 用于tacacs (49)、rip (520) 这类前缀高度歧义的协议。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfirm {
    tag: String,
    port: u16,
}

impl PortConfirm {
    /// 创建新的端口确认分类器
    pub fn new<S: Into<String>>(tag: S, port: u16) -> Self {
        Self {
            tag: tag.into(),
            port,
        }
    }

    /// 标签
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 确认端口
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Classifier for PortConfirm {
    fn name(&self) -> &'static str {
        "port_confirm"
    }

    fn try_classify(&self, session: &mut dyn Session, _data: &[u8], _direction: Direction) -> bool {
        if !session.has_port(self.port) {
            return false;
        }
        session.add_protocol(&self.tag);
        true
    }
}

const NTP_PORT: u16 = 123;
const NTP_MIN_LEN: usize = 48;
const NTP_MAX_STRATUM: u8 = 16;

/// NTP
#[derive(Debug, Clone, Copy, Default)]
pub struct NtpClassifier;

impl Classifier for NtpClassifier {
    fn name(&self) -> &'static str {
        "ntp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if !session.has_port(NTP_PORT) || data.len() < NTP_MIN_LEN || data[1] > NTP_MAX_STRATUM {
            return false;
        }
        session.add_protocol("ntp");
        true
    }
}

/// ISAKMP / IKE (UDP 500, 4500)
///
/// 检查首个载荷类型与版本字节。
#[derive(Debug, Clone, Copy, Default)]
pub struct IsakmpClassifier;

impl Classifier for IsakmpClassifier {
    fn name(&self) -> &'static str {
        "isakmp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 18
            || !matches!(data[16], 1 | 8 | 33 | 46)
            || !matches!(data[17], 0x10 | 0x20 | 0x02)
        {
            return false;
        }
        session.add_protocol("isakmp");
        true
    }
}

/// Aruba PAPI (UDP 8211)
#[derive(Debug, Clone, Copy, Default)]
pub struct ArubaPapiClassifier;

impl Classifier for ArubaPapiClassifier {
    fn name(&self) -> &'static str {
        "aruba-papi"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 20 || data[..2] != [0x49, 0x72] {
            return false;
        }
        session.add_protocol("aruba-papi");
        true
    }
}

/// HSRP v1/v2 (UDP 1985, 2029)
///
/// 组播通告的两端端口相同。
#[derive(Debug, Clone, Copy, Default)]
pub struct HsrpClassifier;

impl Classifier for HsrpClassifier {
    fn name(&self) -> &'static str {
        "hsrp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if session.port1() != session.port2() || data.len() < 3 {
            return false;
        }

        if data[..2] == [0x00, 0x03] {
            session.add_protocol("hsrp");
            true
        } else if data[..3] == [0x01, 0x28, 0x02] {
            session.add_protocol("hsrpv2");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::FlowSession;

    const DIR: Direction = Direction::ClientToServer;

    fn ntp_request() -> Vec<u8> {
        let mut data = vec![0u8; 48];
        data[0] = 0x1b;
        data[1] = 0x05;
        data
    }

    #[test]
    fn test_port_confirm() {
        let rip = PortConfirm::new("rip", 520);
        assert_eq!(rip.tag(), "rip");
        assert_eq!(rip.port(), 520);

        let mut session = FlowSession::udp(520, 520);
        assert!(rip.try_classify(&mut session, b"\x02\x02\x00\x00", DIR));
        assert!(session.has_protocol("rip"));

        let mut session = FlowSession::tcp(50000, 49);
        assert!(PortConfirm::new("tacacs", 49).try_classify(&mut session, b"\xc0\x01\x01", DIR));

        let mut session = FlowSession::udp(50000, 521);
        assert!(!rip.try_classify(&mut session, b"\x02\x02\x00\x00", DIR));
        assert!(session.is_unclassified());
    }

    #[test]
    fn test_ntp() {
        let mut session = FlowSession::udp(50000, 123);
        assert!(NtpClassifier.try_classify(&mut session, &ntp_request(), DIR));

        let mut session = FlowSession::udp(123, 50000);
        assert!(NtpClassifier.try_classify(&mut session, &ntp_request(), DIR));

        let mut session = FlowSession::udp(50000, 124);
        assert!(!NtpClassifier.try_classify(&mut session, &ntp_request(), DIR));

        let mut session = FlowSession::udp(50000, 123);
        assert!(!NtpClassifier.try_classify(&mut session, &ntp_request()[..47], DIR));

        let mut stratum = ntp_request();
        stratum[1] = 17;
        assert!(!NtpClassifier.try_classify(&mut session, &stratum, DIR));
        assert!(session.is_unclassified());
    }

    #[test]
    fn test_isakmp() {
        let mut data = vec![0u8; 28];
        data[16] = 33;
        data[17] = 0x20;
        let mut session = FlowSession::udp(500, 500);
        assert!(IsakmpClassifier.try_classify(&mut session, &data, DIR));

        data[17] = 0x30;
        let mut session = FlowSession::udp(500, 500);
        assert!(!IsakmpClassifier.try_classify(&mut session, &data, DIR));
        assert!(!IsakmpClassifier.try_classify(&mut session, &data[..17], DIR));
        assert!(!IsakmpClassifier.try_classify(&mut session, &[], DIR));
    }

    #[test]
    fn test_aruba_papi() {
        let mut data = vec![0x49, 0x72];
        data.resize(20, 0);
        let mut session = FlowSession::udp(8211, 8211);
        assert!(ArubaPapiClassifier.try_classify(&mut session, &data, DIR));
        assert!(!ArubaPapiClassifier.try_classify(&mut session, &data[..19], DIR));
    }

    #[test]
    fn test_hsrp_versions() {
        let mut session = FlowSession::udp(1985, 1985);
        assert!(HsrpClassifier.try_classify(&mut session, b"\x00\x03\x10\x03", DIR));
        assert!(session.has_protocol("hsrp"));

        let mut session = FlowSession::udp(2029, 2029);
        assert!(HsrpClassifier.try_classify(&mut session, b"\x01\x28\x02\x02", DIR));
        assert!(session.has_protocol("hsrpv2"));

        let mut session = FlowSession::udp(1985, 40000);
        assert!(!HsrpClassifier.try_classify(&mut session, b"\x00\x03\x10", DIR));
        assert!(!HsrpClassifier.try_classify(&mut session, b"\x00", DIR));
        assert!(session.is_unclassified());
    }
}
