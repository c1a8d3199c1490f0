//! 工具模块

pub mod logger;
pub mod search;

pub use logger::{
    init_logger, get_logger, Logger, LoggerConfig, LoggerConfigBuilder, LogLevel,
};
