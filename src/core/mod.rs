//! 核心抽象模块
//!
//! 包含特征注册表、匹配分发器、精化分类器接口以及有界读取工具。

pub mod asn;
pub mod classifier;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod registry;
pub mod session;
pub mod signature;

pub use asn::{read_tlv, Tlv};
pub use classifier::{Classifier, TagProtocol};
pub use config::RegistryConfig;
pub use cursor::ByteCursor;
pub use dispatcher::{ClassifyOutcome, ClassifyStats, Dispatcher};
pub use registry::{PatternCandidates, SignatureRegistry};
pub use session::{Direction, FlowSession, Session, Transport, FIELD_USER};
pub use signature::{PortRole, PortSelector, Selector, SignatureEntry};
