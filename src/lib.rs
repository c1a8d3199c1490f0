//! # PSI-Classifier: 基于特征的应用层协议分类器
//!
//! 将TCP/UDP流某一方向的首批字节与特征注册表匹配，
//! 再由协议专属的精化分类器做结构校验，确认后为会话打上协议标签。
//!
//! ## 特性
//!
//! - **不可变注册表**: 启动期构建，之后可跨线程无锁共享
//! - **全部触发**: 所有匹配的特征都会调用其分类器，不存在先匹配先得
//! - **自校验分类器**: 每个分类器独立完成边界检查，任何输入都不会panic
//! - **有界读取**: 锁存错误标志的字节游标与BER TLV读取
//!
//! ## 快速开始
//!
//! ```rust
//! use psi_classifier::{Direction, Dispatcher, FlowSession, Session, SignatureRegistry};
//!
//! # fn main() -> psi_classifier::Result<()> {
//! let registry = SignatureRegistry::builtin()?;
//! let dispatcher = Dispatcher::new(&registry);
//!
//! let mut session = FlowSession::tcp(51234, 6379);
//! dispatcher.classify(&mut session, b"+PONG\r\n", Direction::ServerToClient);
//! assert!(session.has_protocol("redis"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// 工具模块
pub mod utils;

// 核心模块
pub mod core;
pub mod error;

// 构造器
pub mod builder;

// 精化分类器
pub mod classifiers;

// 内置特征表
#[cfg(feature = "builtin")]
pub mod signatures;

// 重新导出核心类型
pub use crate::core::{
    asn::{read_tlv, Tlv},
    classifier::{Classifier, TagProtocol},
    config::RegistryConfig,
    cursor::ByteCursor,
    dispatcher::{ClassifyOutcome, ClassifyStats, Dispatcher},
    registry::{PatternCandidates, SignatureRegistry},
    session::{Direction, FlowSession, Session, Transport, FIELD_USER},
    signature::{PortRole, PortSelector, Selector, SignatureEntry},
};

pub use crate::builder::RegistryBuilder;
pub use crate::error::{ClassifierError, Result};

/// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 库描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
