//! 错误处理模块测试

use psi_classifier::error::ClassifierError;
use psi_classifier::{RegistryBuilder, RegistryConfig, TagProtocol, Transport};

#[test]
fn test_error_creation() {
    let err = ClassifierError::invalid_signature("pop3", "字节模式不能为空");
    assert!(matches!(err, ClassifierError::InvalidSignature { .. }));
    assert!(err.is_config_error());
}

#[test]
fn test_error_codes() {
    assert_eq!(ClassifierError::invalid_signature("x", "y").error_code(), 2001);
    assert_eq!(ClassifierError::config_error("x").error_code(), 2002);
    assert_eq!(ClassifierError::internal_error("x").error_code(), 2999);
}

#[test]
fn test_error_display() {
    let err = ClassifierError::invalid_signature("gh0st", "empty pattern");
    let display = format!("{}", err);
    assert!(display.contains("gh0st"));
    assert!(display.contains("empty pattern"));

    let err = ClassifierError::config_error("bad list");
    assert_eq!(err.to_string(), "Configuration error: bad list");
}

#[test]
fn test_error_classification() {
    assert!(ClassifierError::config_error("test").is_config_error());
    assert!(!ClassifierError::internal_error("test").is_config_error());
}

#[test]
fn test_error_conversions() {
    let err: ClassifierError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, ClassifierError::InternalError { .. }));
    assert!(err.to_string().contains("boom"));

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ClassifierError = json_err.into();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("JSON error"));
}

#[test]
fn test_build_surfaces_errors() {
    let err = RegistryBuilder::new()
        .register("pop3", Transport::Tcp, 0, b"", TagProtocol::new("pop3"))
        .build()
        .unwrap_err();
    assert_eq!(err.error_code(), 2001);

    let config = RegistryConfig {
        enabled_protocols: Some(Vec::new()),
        disabled_protocols: Vec::new(),
    };
    let err = RegistryBuilder::new().with_config(config).build().unwrap_err();
    assert_eq!(err.error_code(), 2002);
}
