//! 特征定义模块
//!
//! 一条特征绑定选择器（传输层或端口）、偏移、字节模式和精化分类器。
//! 特征在注册后不可变。

use crate::core::classifier::Classifier;
use crate::core::session::Transport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 端口匹配角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRole {
    /// 匹配发起方端口（port1）
    Src,
    /// 匹配响应方端口（port2）
    Dst,
    /// 任一端口
    Either,
}

/// 端口选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortSelector {
    /// 端口
    pub port: u16,
    /// 传输层
    pub transport: Transport,
    /// 匹配角色
    pub role: PortRole,
}

impl PortSelector {
    /// 创建新的端口选择器
    pub fn new(port: u16, transport: Transport, role: PortRole) -> Self {
        Self {
            port,
            transport,
            role,
        }
    }

    /// UDP任一端口
    pub fn udp(port: u16) -> Self {
        Self::new(port, Transport::Udp, PortRole::Either)
    }

    /// TCP任一端口
    pub fn tcp(port: u16) -> Self {
        Self::new(port, Transport::Tcp, PortRole::Either)
    }

    /// TCP源端口
    pub fn tcp_src(port: u16) -> Self {
        Self::new(port, Transport::Tcp, PortRole::Src)
    }

    /// TCP目的端口
    pub fn tcp_dst(port: u16) -> Self {
        Self::new(port, Transport::Tcp, PortRole::Dst)
    }

    /// 检查会话端口对是否满足选择器
    pub fn matches(&self, transport: Transport, port1: u16, port2: u16) -> bool {
        if transport != self.transport {
            return false;
        }
        match self.role {
            PortRole::Src => port1 == self.port,
            PortRole::Dst => port2 == self.port,
            PortRole::Either => port1 == self.port || port2 == self.port,
        }
    }
}

/// 特征选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// 按传输层匹配字节模式
    Transport(Transport),
    /// 按端口匹配，无字节模式
    Port(PortSelector),
}

impl Selector {
    /// 选择器对应的传输层
    pub fn transport(&self) -> Transport {
        match self {
            Self::Transport(transport) => *transport,
            Self::Port(port) => port.transport,
        }
    }
}

/// 特征条目
#[derive(Clone)]
pub struct SignatureEntry {
    name: String,
    selector: Selector,
    offset: usize,
    pattern: Vec<u8>,
    classifier: Arc<dyn Classifier>,
}

impl SignatureEntry {
    /// 创建字节模式特征
    pub fn pattern(
        name: impl Into<String>,
        transport: Transport,
        offset: usize,
        pattern: &[u8],
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            name: name.into(),
            selector: Selector::Transport(transport),
            offset,
            pattern: pattern.to_vec(),
            classifier,
        }
    }

    /// 创建端口特征
    pub fn port(name: impl Into<String>, selector: PortSelector, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            name: name.into(),
            selector: Selector::Port(selector),
            offset: 0,
            pattern: Vec::new(),
            classifier,
        }
    }

    /// 特征名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 选择器
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// 模式偏移
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 字节模式（端口特征为空）
    pub fn pattern_bytes(&self) -> &[u8] {
        &self.pattern
    }

    /// 精化分类器
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// 是否为端口特征
    pub fn is_port_keyed(&self) -> bool {
        matches!(self.selector, Selector::Port(_))
    }

    /// 评估模式所需的最小缓冲区长度
    pub fn min_len(&self) -> usize {
        self.offset.saturating_add(self.pattern.len())
    }

    /// 检测数据是否匹配字节模式
    ///
    /// 缓冲区短于`offset + pattern.len()`时不匹配。端口特征恒为true。
    pub fn matches(&self, data: &[u8]) -> bool {
        if self.is_port_keyed() {
            return true;
        }
        match data.get(self.offset..self.min_len()) {
            Some(window) => window == self.pattern.as_slice(),
            None => false,
        }
    }
}

impl fmt::Debug for SignatureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEntry")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("offset", &self.offset)
            .field("pattern", &self.pattern)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
