//! 帧结构类分类器
//!
//! 依靠帧头中声明的长度与实际缓冲区长度的一致性，或固定偏移上的结构字节，
//! 确认由短前缀触发的候选协议。

use crate::core::classifier::Classifier;
use crate::core::session::{Direction, Session, FIELD_USER};
use crate::utils::search;

/// 读取指定偏移的大端16位长度并加上固定调整量
fn declared_len(data: &[u8], at: usize, adjust: usize) -> Option<usize> {
    let bytes = data.get(at..at + 2)?;
    Some(usize::from(u16::from_be_bytes([bytes[0], bytes[1]])) + adjust)
}

const MSTSHASH: &[u8] = b"Cookie: mstshash=";
const MSTSHASH_END: usize = 11 + MSTSHASH.len();

/// RDP (TPKT + X.224 Connection Request)
///
/// 附带从mstshash cookie中提取登录名。
#[derive(Debug, Clone, Copy, Default)]
pub struct RdpClassifier;

impl Classifier for RdpClassifier {
    fn name(&self) -> &'static str {
        "rdp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let len = data.len();
        if len <= 5 {
            return false;
        }

        let declared = data[3];
        if usize::from(declared) > len || declared.checked_sub(5) != Some(data[4]) || data[5] != 0xe0 {
            return false;
        }

        session.add_protocol("rdp");

        if len > 30 && data.get(11..MSTSHASH_END) == Some(MSTSHASH) {
            let cookie = &data[MSTSHASH_END..];
            if let Some(end) = search::find(cookie, b"\r\n") {
                session.add_field_lowercase(FIELD_USER, &cookie[..end]);
            }
        }
        true
    }
}

/// Gh0st RAT
///
/// 偏移13处为zlib头0x78，偏移5..9处为小端（Windows）或大端（Mac）包长。
#[derive(Debug, Clone, Copy, Default)]
pub struct Gh0stClassifier;

impl Classifier for Gh0stClassifier {
    fn name(&self) -> &'static str {
        "gh0st"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let len = data.len();
        if len < 14 || data[13] != 0x78 {
            return false;
        }

        let windows = data[7] == 0
            && data[8] == 0
            && usize::from(u16::from_le_bytes([data[5], data[6]])) == len;
        let mac = data[5] == 0
            && data[6] == 0
            && usize::from(u16::from_be_bytes([data[7], data[8]])) == len;
        let zlib = len >= 15
            && data[7] == 0
            && data[8] == 0
            && data[11] == 0
            && data[12] == 0
            && data[14] == 0x9c;

        if windows || mac || zlib {
            session.add_protocol("gh0st");
            return true;
        }
        false
    }
}

/// FLAP (AIM/ICQ)
///
/// 帧长必须等于缓冲区长度，或者紧随其后是下一帧的'*'标记。
#[derive(Debug, Clone, Copy, Default)]
pub struct FlapClassifier;

impl Classifier for FlapClassifier {
    fn name(&self) -> &'static str {
        "flap"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let flen = match declared_len(data, 4, 6) {
            Some(flen) => flen,
            None => return false,
        };
        if data.len() < flen {
            return false;
        }

        if data.len() == flen || data[flen] == b'*' {
            session.add_protocol("flap");
            return true;
        }
        false
    }
}

/// Kafka请求
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaClassifier;

/// Kafka API key上限
const KAFKA_MAX_API_KEY: u8 = 6;

impl Classifier for KafkaClassifier {
    fn name(&self) -> &'static str {
        "kafka"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 10 || data[4] != 0 || data[5] > KAFKA_MAX_API_KEY || data[7] != 0 {
            return false;
        }

        if declared_len(data, 2, 4) != Some(data.len()) {
            return false;
        }
        session.add_protocol("kafka");
        true
    }
}

const STUN_MAGIC_COOKIE: [u8; 4] = [0x21, 0x12, 0xa4, 0x42];

/// STUN (UDP)
///
/// 消息长度字段加20字节头必须等于缓冲区长度，并且带有RFC 5389魔术cookie，
/// 或者是属性长度同样自洽的RFC 3489绑定请求。
#[derive(Debug, Clone, Copy, Default)]
pub struct StunClassifier;

impl Classifier for StunClassifier {
    fn name(&self) -> &'static str {
        "stun"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let len = data.len();
        if len < 4 || 20 + usize::from(data[3]) != len {
            return false;
        }

        if data.get(4..8) == Some(&STUN_MAGIC_COOKIE[..]) {
            session.add_protocol("stun");
            return true;
        }

        if data[1] == 1 && len > 25 && usize::from(data[23]) + 24 == len {
            session.add_protocol("stun");
            return true;
        }
        false
    }
}

/// Skinny (SCCP)，TCP目的端口2000
#[derive(Debug, Clone, Copy, Default)]
pub struct SccpClassifier;

impl Classifier for SccpClassifier {
    fn name(&self) -> &'static str {
        "sccp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let len = data.len();
        if len <= 20 || len < usize::from(data[0]) + 8 || data[1..8].iter().any(|&b| b != 0) {
            return false;
        }
        session.add_protocol("sccp");
        true
    }
}

/// 分帧的Thrift二进制协议
#[derive(Debug, Clone, Copy, Default)]
pub struct ThriftClassifier;

impl Classifier for ThriftClassifier {
    fn name(&self) -> &'static str {
        "thrift"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() <= 20 || data[4..7] != [0x80, 0x01, 0x00] {
            return false;
        }
        session.add_protocol("thrift");
        true
    }
}

/// VNC (RFB版本握手 "RFB 003.008\n")
#[derive(Debug, Clone, Copy, Default)]
pub struct VncClassifier;

impl Classifier for VncClassifier {
    fn name(&self) -> &'static str {
        "vnc"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 12 || data[7] != b'.' || data[11] != b'\n' {
            return false;
        }
        session.add_protocol("vnc");
        true
    }
}

/// HDFS数据传输
#[derive(Debug, Clone, Copy, Default)]
pub struct HdfsClassifier;

impl Classifier for HdfsClassifier {
    fn name(&self) -> &'static str {
        "hdfs"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 10 || data[5] != 0x0a {
            return false;
        }
        session.add_protocol("hdfs");
        true
    }
}
