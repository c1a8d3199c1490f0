//! 有界字节游标
//!
//! 顺序读取定长整数与变长字节段。任何一次越界访问都会锁存错误标志，
//! 此后所有读取都返回零值或空切片。调用方在信任读取结果之前必须检查
//! [`ByteCursor::is_error`]。

use bytes::Buf;

/// 有界字节游标
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    rest: &'a [u8],
    error: bool,
}

impl<'a> ByteCursor<'a> {
    /// 在字节切片上创建游标
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            rest: data,
            error: false,
        }
    }

    /// 当前读取位置
    pub fn position(&self) -> usize {
        self.data.len() - self.rest.len()
    }

    /// 剩余可读字节数（错误状态下为0）
    pub fn remaining(&self) -> usize {
        if self.error {
            0
        } else {
            self.rest.remaining()
        }
    }

    /// 是否已进入错误状态
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// 是否可以信任已读取的值
    pub fn is_ok(&self) -> bool {
        !self.error
    }

    fn ensure(&mut self, n: usize) -> bool {
        if self.error {
            return false;
        }
        if self.rest.remaining() < n {
            self.error = true;
            return false;
        }
        true
    }

    /// 跳过n个字节
    pub fn skip(&mut self, n: usize) {
        if self.ensure(n) {
            self.rest.advance(n);
        }
    }

    /// 读取一个字节
    pub fn read_u8(&mut self) -> u8 {
        if self.ensure(1) {
            self.rest.get_u8()
        } else {
            0
        }
    }

    /// 读取大端16位整数
    pub fn read_u16_be(&mut self) -> u16 {
        if self.ensure(2) {
            self.rest.get_u16()
        } else {
            0
        }
    }

    /// 读取大端32位整数
    pub fn read_u32_be(&mut self) -> u32 {
        if self.ensure(4) {
            self.rest.get_u32()
        } else {
            0
        }
    }

    /// 读取n个字节，越界时返回空切片
    pub fn read_bytes(&mut self, n: usize) -> &'a [u8] {
        if !self.ensure(n) {
            return &[];
        }
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads() {
        let data = [0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x2a, b'h', b'i'];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u8(), 0x01);
        assert_eq!(cursor.read_u16_be(), 0x0203);
        assert_eq!(cursor.read_u32_be(), 42);
        assert_eq!(cursor.read_bytes(2), b"hi");
        assert!(cursor.is_ok());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn test_underrun_latches() {
        let data = [0x00, 0x05, b'a', b'b'];
        let mut cursor = ByteCursor::new(&data);

        let len = cursor.read_u16_be() as usize;
        assert!(cursor.read_bytes(len).is_empty());
        assert!(cursor.is_error());

        // 之后的读取全部为空操作
        let pos = cursor.position();
        assert_eq!(cursor.read_u8(), 0);
        assert_eq!(cursor.read_u16_be(), 0);
        cursor.skip(0);
        assert!(cursor.read_bytes(0).is_empty());
        assert!(cursor.is_error());
        assert_eq!(cursor.position(), pos);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_skip_past_end() {
        let mut cursor = ByteCursor::new(b"abc");
        cursor.skip(3);
        assert!(cursor.is_ok());
        cursor.skip(1);
        assert!(cursor.is_error());
    }

    #[test]
    fn test_empty_buffer() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(cursor.read_bytes(0).is_empty());
        assert!(cursor.is_ok());
        assert_eq!(cursor.read_u8(), 0);
        assert!(cursor.is_error());
    }
}
