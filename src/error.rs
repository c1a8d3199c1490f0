//! 错误处理模块
//!
//! 分类核心在运行期不产生错误：短缓冲、结构不符、游标越界都视为“未匹配”。
//! 这里的错误只出现在启动期的特征注册与配置加载阶段。

use thiserror::Error;

/// PSI-Classifier的结果类型
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// 分类器错误类型
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// 特征定义非法（空模式、空名称、端口为0）
    #[error("Invalid signature '{name}': {reason}")]
    InvalidSignature {
        /// 特征名称
        name: String,
        /// 失败原因
        reason: String,
    },

    /// 配置错误
    #[error("Configuration error: {message}")]
    ConfigError {
        /// 错误消息
        message: String,
    },

    /// 内部错误
    #[error("Internal error: {message}")]
    InternalError {
        /// 错误消息
        message: String,
    },
}

impl ClassifierError {
    /// 创建特征非法错误
    pub fn invalid_signature<S1, S2>(name: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::InvalidSignature {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// 检查是否为配置相关错误
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidSignature { .. }
        )
    }

    /// 获取错误代码
    pub fn error_code(&self) -> u32 {
        match self {
            Self::InvalidSignature { .. } => 2001,
            Self::ConfigError { .. } => 2002,
            Self::InternalError { .. } => 2999,
        }
    }
}

/// 从anyhow::Error转换
impl From<anyhow::Error> for ClassifierError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_error(err.to_string())
    }
}

/// 从serde_json::Error转换
impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_error(format!("JSON error: {}", err))
    }
}
