//! ASN.1 BER TLV读取
//!
//! 只做结构校验所需的最小解码：标识符、长度、值。不定长编码直接拒绝。

use crate::core::cursor::ByteCursor;

/// 高位标签最多允许的续接字节数
const MAX_TAG_OCTETS: usize = 4;
/// 长格式长度最多允许的字节数
const MAX_LENGTH_OCTETS: usize = 4;

/// BER类型-长度-值三元组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// 标签类别（高两位）
    pub class: u8,
    /// 是否为构造类型
    pub constructed: bool,
    /// 标签号
    pub tag: u32,
    /// 值
    pub value: &'a [u8],
}

/// 从游标读取一个TLV，任何越界或非法编码返回None
pub fn read_tlv<'a>(cursor: &mut ByteCursor<'a>) -> Option<Tlv<'a>> {
    let ident = cursor.read_u8();
    if cursor.is_error() {
        return None;
    }

    let class = ident >> 6;
    let constructed = ident & 0x20 != 0;
    let mut tag = u32::from(ident & 0x1f);

    if tag == 0x1f {
        tag = 0;
        let mut terminated = false;
        for _ in 0..MAX_TAG_OCTETS {
            let octet = cursor.read_u8();
            if cursor.is_error() {
                return None;
            }
            tag = (tag << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                terminated = true;
                break;
            }
        }
        if !terminated {
            return None;
        }
    }

    let first = cursor.read_u8();
    if cursor.is_error() {
        return None;
    }

    let length = if first & 0x80 == 0 {
        usize::from(first)
    } else {
        let count = usize::from(first & 0x7f);
        // 0x80为不定长编码
        if count == 0 || count > MAX_LENGTH_OCTETS {
            return None;
        }
        let mut length = 0usize;
        for _ in 0..count {
            length = (length << 8) | usize::from(cursor.read_u8());
        }
        if cursor.is_error() {
            return None;
        }
        length
    };

    let value = cursor.read_bytes(length);
    if cursor.is_error() {
        return None;
    }

    Some(Tlv {
        class,
        constructed,
        tag,
        value,
    })
}
