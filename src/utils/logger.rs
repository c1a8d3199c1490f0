//! 日志模块
//!
//! 封装rat_logger日志库，提供统一的日志开关与级别过滤。
//! 终端或文件输出由宿主进程初始化rat_logger时决定，这里只负责门控：
//! 在[`init_logger`]调用之前所有`psi_*`宏都是静默的。

use once_cell::sync::OnceCell;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 是否启用日志
    pub enabled: bool,
    /// 日志级别
    pub level: LogLevel,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// 错误
    Error,
    /// 警告
    Warn,
    /// 信息
    Info,
    /// 调试
    Debug,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Info,
        }
    }
}

/// 日志器
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    /// 创建新的日志器
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// 获取配置
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// 检查是否启用了指定级别的日志
    pub fn is_enabled(&self, level: &LogLevel) -> bool {
        self.config.enabled && level <= &self.config.level
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

/// 全局日志器实例
static GLOBAL_LOGGER: OnceCell<Logger> = OnceCell::new();

/// 初始化全局日志器
///
/// 只有第一次调用生效，返回值表示本次调用是否完成了初始化。
pub fn init_logger(config: LoggerConfig) -> bool {
    GLOBAL_LOGGER.set(Logger::new(config)).is_ok()
}

/// 获取全局日志器
pub fn get_logger() -> Option<&'static Logger> {
    GLOBAL_LOGGER.get()
}

/// 错误日志
#[macro_export]
macro_rules! psi_error {
    ($($arg:tt)*) => {
        if let Some(logger) = $crate::utils::logger::get_logger() {
            if logger.is_enabled(&$crate::utils::logger::LogLevel::Error) {
                rat_logger::error!($($arg)*);
            }
        }
    };
}

/// 警告日志
#[macro_export]
macro_rules! psi_warn {
    ($($arg:tt)*) => {
        if let Some(logger) = $crate::utils::logger::get_logger() {
            if logger.is_enabled(&$crate::utils::logger::LogLevel::Warn) {
                rat_logger::warn!($($arg)*);
            }
        }
    };
}

/// 信息日志
#[macro_export]
macro_rules! psi_info {
    ($($arg:tt)*) => {
        if let Some(logger) = $crate::utils::logger::get_logger() {
            if logger.is_enabled(&$crate::utils::logger::LogLevel::Info) {
                rat_logger::info!($($arg)*);
            }
        }
    };
}

/// 调试日志
#[macro_export]
macro_rules! psi_debug {
    ($($arg:tt)*) => {
        if let Some(logger) = $crate::utils::logger::get_logger() {
            if logger.is_enabled(&$crate::utils::logger::LogLevel::Debug) {
                rat_logger::debug!($($arg)*);
            }
        }
    };
}

/// PSI分类确认日志
#[macro_export]
macro_rules! psi_detect {
    ($($arg:tt)*) => {
        if let Some(logger) = $crate::utils::logger::get_logger() {
            if logger.is_enabled(&$crate::utils::logger::LogLevel::Debug) {
                rat_logger::debug!("🔍 DETECT: {}", format!($($arg)*));
            }
        }
    };
}

/// 构建器模式的日志配置
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// 创建新的配置构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否启用日志
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// 设置日志级别
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// 构建配置
    pub fn build(self) -> LoggerConfig {
        self.config
    }

    /// 构建并初始化日志器
    pub fn init(self) -> bool {
        init_logger(self.config)
    }
}

/// 创建禁用日志的配置
pub fn disabled_config() -> LoggerConfig {
    LoggerConfig {
        enabled: false,
        ..Default::default()
    }
}

/// 创建开发环境的日志配置
pub fn dev_config() -> LoggerConfig {
    LoggerConfigBuilder::new().level(LogLevel::Debug).build()
}

/// 创建生产环境的日志配置
pub fn prod_config() -> LoggerConfig {
    LoggerConfigBuilder::new().level(LogLevel::Warn).build()
}
