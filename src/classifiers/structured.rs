//! 结构化报文分类器
//!
//! 借助[`ByteCursor`]与[`read_tlv`]逐层遍历报文，游标任何越界都会使结果作废。

use crate::core::asn::read_tlv;
use crate::core::classifier::Classifier;
use crate::core::cursor::ByteCursor;
use crate::core::session::{Direction, Session, FIELD_USER};

/// BER: SEQUENCE
const TAG_SEQUENCE: u32 = 16;
/// BER: INTEGER
const TAG_INTEGER: u32 = 2;
const SNMP_MIN_MESSAGE_LEN: usize = 16;
/// SNMPv3
const SNMP_MAX_VERSION: u8 = 3;

/// SNMP
///
/// 外层SEQUENCE内第一个元素必须是单字节的版本号INTEGER。
#[derive(Debug, Clone, Copy, Default)]
pub struct SnmpClassifier;

impl Classifier for SnmpClassifier {
    fn name(&self) -> &'static str {
        "snmp"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        let mut cursor = ByteCursor::new(data);
        let message = match read_tlv(&mut cursor) {
            Some(tlv) if tlv.tag == TAG_SEQUENCE && tlv.value.len() >= SNMP_MIN_MESSAGE_LEN => tlv,
            _ => return false,
        };

        let mut inner = ByteCursor::new(message.value);
        match read_tlv(&mut inner) {
            Some(version)
                if version.tag == TAG_INTEGER
                    && version.value.len() == 1
                    && version.value[0] <= SNMP_MAX_VERSION =>
            {
                session.add_protocol("snmp");
                true
            }
            _ => false,
        }
    }
}

const MQTT_MIN_CONNECT_LEN: usize = 30;
const MQTT_FLAG_WILL: u8 = 0x04;
const MQTT_FLAG_USER_NAME: u8 = 0x80;

/// MQTT CONNECT
///
/// 协议名以"MQ"开头（"MQTT" / "MQIsdp"）即打标签，随后遍历可变头与载荷提取用户名。
#[derive(Debug, Clone, Copy, Default)]
pub struct MqttClassifier;

impl MqttClassifier {
    /// 遍历CONNECT报文，返回用户名（若存在且游标无错）
    fn user_name(data: &[u8]) -> Option<&[u8]> {
        let mut cursor = ByteCursor::new(data);
        // 固定头: 报文类型 + 剩余长度
        cursor.skip(2);

        let name_len = cursor.read_u16_be();
        cursor.skip(usize::from(name_len));
        // 协议级别
        cursor.skip(1);
        let flags = cursor.read_u8();
        // keep alive
        cursor.skip(2);

        let id_len = cursor.read_u16_be();
        cursor.skip(usize::from(id_len));

        if flags & MQTT_FLAG_WILL != 0 {
            let topic_len = cursor.read_u16_be();
            cursor.skip(usize::from(topic_len));
            let message_len = cursor.read_u16_be();
            cursor.skip(usize::from(message_len));
        }

        if flags & MQTT_FLAG_USER_NAME == 0 {
            return None;
        }

        let user_len = cursor.read_u16_be();
        let user = cursor.read_bytes(usize::from(user_len));
        if cursor.is_error() || user.is_empty() {
            return None;
        }
        Some(user)
    }
}

impl Classifier for MqttClassifier {
    fn name(&self) -> &'static str {
        "mqtt"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < MQTT_MIN_CONNECT_LEN || data.get(4..6) != Some(&b"MQ"[..]) {
            return false;
        }

        session.add_protocol("mqtt");
        if let Some(user) = Self::user_name(data) {
            session.add_field_lowercase(FIELD_USER, user);
        }
        true
    }
}
