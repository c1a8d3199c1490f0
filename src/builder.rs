//! 注册表构造器模块
//!
//! 提供流畅的链式API在启动期登记特征，`build()`时统一校验并冻结。
//!
//! # 示例
//!
//! ```rust
//! use psi_classifier::{
//!     Direction, Dispatcher, FlowSession, PortSelector, RegistryBuilder, Session, TagProtocol, Transport,
//! };
//! use psi_classifier::classifiers::PortConfirm;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RegistryBuilder::new()
//!     .register("zabbix", Transport::Tcp, 0, b"ZBXD\x01", TagProtocol::new("zabbix"))
//!     .register_both("sip", 0, b"SIP/2.0", TagProtocol::new("sip"))
//!     .register_port("rip", PortSelector::udp(520), PortConfirm::new("rip", 520))
//!     .build()?;
//!
//! let mut session = FlowSession::tcp(41000, 10051);
//! Dispatcher::new(&registry).classify(&mut session, b"ZBXD\x01\x10\x00", Direction::ClientToServer);
//! assert!(session.has_protocol("zabbix"));
//! # Ok(())
//! # }
//! ```

use crate::core::{
    classifier::Classifier,
    config::RegistryConfig,
    registry::SignatureRegistry,
    session::Transport,
    signature::{Selector, SignatureEntry, PortSelector},
};
use crate::error::{ClassifierError, Result};
use std::sync::Arc;

/// 注册表构造器
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<SignatureEntry>,
    config: RegistryConfig,
}

impl RegistryBuilder {
    /// 创建新的注册表构造器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置注册表配置
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// 登记一条字节模式特征
    pub fn register<C: Classifier + 'static>(
        self,
        name: &str,
        transport: Transport,
        offset: usize,
        pattern: &[u8],
        classifier: C,
    ) -> Self {
        self.register_transports(name, &[transport], offset, pattern, Arc::new(classifier))
    }

    /// 同一模式同时登记TCP与UDP
    pub fn register_both<C: Classifier + 'static>(
        self,
        name: &str,
        offset: usize,
        pattern: &[u8],
        classifier: C,
    ) -> Self {
        self.register_transports(
            name,
            &[Transport::Tcp, Transport::Udp],
            offset,
            pattern,
            Arc::new(classifier),
        )
    }

    /// 同一模式登记到多个传输层，共享同一个分类器实例
    pub fn register_transports(
        mut self,
        name: &str,
        transports: &[Transport],
        offset: usize,
        pattern: &[u8],
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        for &transport in transports {
            self.entries.push(SignatureEntry::pattern(
                name,
                transport,
                offset,
                pattern,
                classifier.clone(),
            ));
        }
        self
    }

    /// 登记一条端口特征
    pub fn register_port<C: Classifier + 'static>(
        mut self,
        name: &str,
        selector: PortSelector,
        classifier: C,
    ) -> Self {
        self.entries
            .push(SignatureEntry::port(name, selector, Arc::new(classifier)));
        self
    }

    /// 登记内置协议特征表
    #[cfg(feature = "builtin")]
    pub fn with_builtin_signatures(self) -> Self {
        crate::signatures::register_builtin(self)
    }

    /// 已登记的特征数量
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    fn validate_entry(entry: &SignatureEntry) -> Result<()> {
        if entry.name().is_empty() {
            return Err(ClassifierError::invalid_signature(
                entry.name(),
                "特征名称不能为空",
            ));
        }
        match entry.selector() {
            Selector::Transport(_) if entry.pattern_bytes().is_empty() => Err(
                ClassifierError::invalid_signature(entry.name(), "字节模式不能为空"),
            ),
            Selector::Port(selector) if selector.port == 0 => Err(
                ClassifierError::invalid_signature(entry.name(), "端口不能为0"),
            ),
            _ => Ok(()),
        }
    }

    /// 校验并构建注册表
    pub fn build(self) -> Result<SignatureRegistry> {
        self.config.validate()?;

        for entry in &self.entries {
            Self::validate_entry(entry)?;
        }

        for name in self.config.referenced_names() {
            if !self.entries.iter().any(|entry| entry.name() == name) {
                crate::psi_warn!("⚠️ [注册表] 配置中的协议未登记任何特征: {}", name);
            }
        }

        let total = self.entries.len();
        let config = self.config;
        let admitted: Vec<SignatureEntry> = self
            .entries
            .into_iter()
            .filter(|entry| config.admits(entry.name()))
            .collect();

        let registry = SignatureRegistry::from_entries(admitted);
        crate::psi_info!(
            "✅ [注册表] 构建完成: {} 条特征 ({} 条被配置过滤), {} 个协议",
            registry.len(),
            total - registry.len(),
            registry.names().len()
        );

        Ok(registry)
    }
}

impl SignatureRegistry {
    /// 创建注册表构造器
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// 构建仅包含内置特征表的注册表
    #[cfg(feature = "builtin")]
    pub fn builtin() -> Result<Self> {
        RegistryBuilder::new().with_builtin_signatures().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::TagProtocol;

    #[test]
    fn test_register_both() {
        let registry = RegistryBuilder::new()
            .register_both("sip", 0, b"SIP/2.0", TagProtocol::new("sip"))
            .build()
            .unwrap();

        let transports: Vec<Transport> = registry
            .entries_named("sip")
            .map(|entry| entry.selector().transport())
            .collect();
        assert_eq!(transports, vec![Transport::Tcp, Transport::Udp]);
    }

    #[test]
    fn test_programmer_errors() {
        let err = RegistryBuilder::new()
            .register("empty", Transport::Tcp, 0, b"", TagProtocol::new("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidSignature { .. }));

        let err = RegistryBuilder::new()
            .register("", Transport::Tcp, 0, b"x", TagProtocol::new("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidSignature { .. }));

        let err = RegistryBuilder::new()
            .register_port("zero", PortSelector::udp(0), TagProtocol::new("x"))
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn test_config_filters_entries() {
        let registry = RegistryBuilder::new()
            .with_config(RegistryConfig::new().disable_protocol("pop3"))
            .register("pop3", Transport::Tcp, 0, b"+OK ", TagProtocol::new("pop3"))
            .register("redis", Transport::Tcp, 0, b"+PONG", TagProtocol::new("redis"))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].name(), "redis");
    }
}
