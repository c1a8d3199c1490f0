//! 注册表配置
//!
//! 控制哪些特征名称允许进入注册表，可由JSON加载。

use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};

/// 注册表配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 允许列表，None表示全部允许
    pub enabled_protocols: Option<Vec<String>>,
    /// 禁用列表，优先于允许列表
    pub disabled_protocols: Vec<String>,
}

impl RegistryConfig {
    /// 创建默认配置（全部允许）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从JSON加载
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 加入允许列表
    pub fn enable_protocol<S: Into<String>>(mut self, name: S) -> Self {
        self.enabled_protocols
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// 加入禁用列表
    pub fn disable_protocol<S: Into<String>>(mut self, name: S) -> Self {
        self.disabled_protocols.push(name.into());
        self
    }

    /// 特征名称是否被允许
    pub fn admits(&self, name: &str) -> bool {
        if self.disabled_protocols.iter().any(|n| n == name) {
            return false;
        }
        match &self.enabled_protocols {
            Some(enabled) => enabled.iter().any(|n| n == name),
            None => true,
        }
    }

    /// 配置中出现过的所有名称
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.enabled_protocols
            .iter()
            .flatten()
            .chain(self.disabled_protocols.iter())
            .map(String::as_str)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if let Some(enabled) = &self.enabled_protocols {
            if enabled.is_empty() {
                return Err(ClassifierError::config_error("至少需要启用一个协议"));
            }
            if enabled.iter().any(|name| name.is_empty()) {
                return Err(ClassifierError::config_error("协议名称不能为空"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits() {
        let config = RegistryConfig::new();
        assert!(config.admits("ntp"));

        let config = RegistryConfig::new()
            .enable_protocol("ntp")
            .enable_protocol("snmp")
            .disable_protocol("snmp");
        assert!(config.admits("ntp"));
        assert!(!config.admits("snmp"));
        assert!(!config.admits("rdp"));
    }

    #[test]
    fn test_from_json() {
        let config = RegistryConfig::from_json(r#"{"disabled_protocols": ["gh0st"]}"#).unwrap();
        assert_eq!(config.enabled_protocols, None);
        assert!(!config.admits("gh0st"));

        let round_trip = RegistryConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[test]
    fn test_invalid_config() {
        let err = RegistryConfig::from_json(r#"{"enabled_protocols": []}"#).unwrap_err();
        assert!(err.is_config_error());

        let err = RegistryConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ClassifierError::ConfigError { .. }));
    }
}
