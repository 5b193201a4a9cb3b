use std::io::Write;

use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use gymdesk::{CliArgs, ServerConfig};

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn defaults_apply_without_file_or_flags() {
    let config = ServerConfig::from_args(CliArgs::default()).expect("config");
    assert_eq!(config.bind_address.port(), 8077);
    assert_eq!(config.default_balance, Decimal::from(1000));
    assert!(config.admin_username.is_none());
}

#[test]
fn file_values_are_loaded() {
    let file = yaml_file("bind: 0.0.0.0:9000\ndefault_balance: 50\n");
    let args = CliArgs {
        config: Some(file.path().to_path_buf()),
        ..CliArgs::default()
    };
    let config = ServerConfig::from_args(args).expect("config");
    assert_eq!(config.bind_address.port(), 9000);
    assert_eq!(config.default_balance, Decimal::from(50));
}

#[test]
fn cli_flags_override_the_file() {
    let file = yaml_file("default_balance: 50\n");
    let args = CliArgs {
        config: Some(file.path().to_path_buf()),
        default_balance: Some(2500),
        ..CliArgs::default()
    };
    let config = ServerConfig::from_args(args).expect("config");
    assert_eq!(config.default_balance, Decimal::from(2500));
}

#[test]
fn missing_config_file_is_an_error() {
    let args = CliArgs {
        config: Some("/definitely/not/here.yaml".into()),
        ..CliArgs::default()
    };
    assert!(ServerConfig::from_args(args).is_err());
}

#[test]
fn admin_credentials_must_be_complete() {
    let config = ServerConfig {
        admin_username: Some("root".into()),
        admin_password: None,
        ..ServerConfig::from_args(CliArgs::default()).expect("config")
    };
    assert!(config.validate().is_err());

    let config = ServerConfig {
        admin_username: None,
        admin_token: Some("fixed-token".into()),
        ..ServerConfig::from_args(CliArgs::default()).expect("config")
    };
    assert!(config.validate().is_err());

    let config = ServerConfig {
        admin_username: Some("root".into()),
        admin_password: Some("hunter2-but-long".into()),
        admin_token: Some("fixed-token".into()),
        ..ServerConfig::from_args(CliArgs::default()).expect("config")
    };
    assert!(config.validate().is_ok());
}

#[test]
fn default_balance_outside_money_range_fails_validation() {
    let args = CliArgs {
        default_balance: Some(10_000_000),
        ..CliArgs::default()
    };
    let config = ServerConfig::from_args(args).expect("config");
    assert!(config.validate().is_err());
}
