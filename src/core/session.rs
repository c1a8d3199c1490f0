//! 会话抽象
//!
//! 会话由外部抓包层拥有。分类核心只消费三种能力：读取端口与传输层、
//! 追加协议标签、追加小写化的字段值。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 登录名字段
pub const FIELD_USER: &str = "user";

/// 传输层类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// 数据方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 发起方到响应方
    ClientToServer,
    /// 响应方到发起方
    ServerToClient,
}

impl Direction {
    /// 反向
    pub fn reverse(self) -> Self {
        match self {
            Self::ClientToServer => Self::ServerToClient,
            Self::ServerToClient => Self::ClientToServer,
        }
    }
}

/// 分类器可见的会话能力
///
/// 协议标签集合只增不减，重复添加为空操作。
pub trait Session {
    /// 会话传输层
    fn transport(&self) -> Transport;

    /// 发起方端口
    fn port1(&self) -> u16;

    /// 响应方端口
    fn port2(&self) -> u16;

    /// 添加协议标签
    fn add_protocol(&mut self, tag: &str);

    /// 是否已有协议标签
    fn has_protocol(&self, tag: &str) -> bool;

    /// 以小写形式追加字段值
    fn add_field_lowercase(&mut self, field: &str, value: &[u8]);

    /// 任一端口是否等于给定端口
    fn has_port(&self, port: u16) -> bool {
        self.port1() == port || self.port2() == port
    }
}

/// 内存会话实现
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSession {
    transport: Transport,
    port1: u16,
    port2: u16,
    protocols: BTreeSet<String>,
    fields: BTreeMap<String, Vec<String>>,
}

impl FlowSession {
    /// 创建新的会话
    pub fn new(transport: Transport, port1: u16, port2: u16) -> Self {
        Self {
            transport,
            port1,
            port2,
            protocols: BTreeSet::new(),
            fields: BTreeMap::new(),
        }
    }

    /// 创建TCP会话
    pub fn tcp(port1: u16, port2: u16) -> Self {
        Self::new(Transport::Tcp, port1, port2)
    }

    /// 创建UDP会话
    pub fn udp(port1: u16, port2: u16) -> Self {
        Self::new(Transport::Udp, port1, port2)
    }

    /// 所有协议标签（有序）
    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.protocols.iter().map(String::as_str)
    }

    /// 协议标签数量
    pub fn protocol_count(&self) -> usize {
        self.protocols.len()
    }

    /// 是否尚未被分类
    pub fn is_unclassified(&self) -> bool {
        self.protocols.is_empty()
    }

    /// 获取字段值
    pub fn field_values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Session for FlowSession {
    fn transport(&self) -> Transport {
        self.transport
    }

    fn port1(&self) -> u16 {
        self.port1
    }

    fn port2(&self) -> u16 {
        self.port2
    }

    fn add_protocol(&mut self, tag: &str) {
        if !self.protocols.contains(tag) {
            self.protocols.insert(tag.to_string());
        }
    }

    fn has_protocol(&self, tag: &str) -> bool {
        self.protocols.contains(tag)
    }

    fn add_field_lowercase(&mut self, field: &str, value: &[u8]) {
        let value = String::from_utf8_lossy(value).to_lowercase();
        let values = self.fields.entry(field.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }
}
