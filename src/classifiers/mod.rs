//! 协议精化分类器
//!
//! 按校验策略分组：
//! - [`framing`]: 声明长度与固定偏移结构
//! - [`text`]: 文本令牌搜索
//! - [`structured`]: 游标/TLV遍历与字段提取
//! - [`port`]: 端口确认与数值边界

pub mod framing;
pub mod port;
pub mod structured;
pub mod text;

pub use framing::{
    FlapClassifier, Gh0stClassifier, HdfsClassifier, KafkaClassifier, RdpClassifier,
    SccpClassifier, StunClassifier, ThriftClassifier, VncClassifier,
};
pub use port::{ArubaPapiClassifier, HsrpClassifier, IsakmpClassifier, NtpClassifier, PortConfirm};
pub use structured::{MqttClassifier, SnmpClassifier};
pub use text::{
    Banner220Classifier, DropboxLanSyncClassifier, ImapClassifier, JabberClassifier,
    StunRspClassifier, SyslogClassifier, UserLoginClassifier,
};
