use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::validate::check_money;

const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8077";
const DEFAULT_CLIENT_BALANCE: i64 = 1000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    /// Balance granted to every freshly created client.
    pub default_balance: Decimal,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// Optional fixed API token registered for the bootstrap admin.
    pub admin_token: Option<String>,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            bind,
            default_balance: cli_default_balance,
            admin_username: cli_admin_username,
            admin_password: cli_admin_password,
            admin_token: cli_admin_token,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            bind: file_bind,
            default_balance: file_default_balance,
            admin_username: file_admin_username,
            admin_password: file_admin_password,
            admin_token: file_admin_token,
        } = file_config;

        let bind_address = bind.or(file_bind).unwrap_or_else(|| {
            DEFAULT_HTTP_BIND.parse().expect("default bind address valid")
        });

        let default_balance = Decimal::from(
            cli_default_balance
                .or(file_default_balance)
                .unwrap_or(DEFAULT_CLIENT_BALANCE),
        );

        Ok(Self {
            bind_address,
            default_balance,
            admin_username: cli_admin_username.or(file_admin_username),
            admin_password: cli_admin_password.or(file_admin_password),
            admin_token: cli_admin_token.or(file_admin_token),
        })
    }

    /// Fail-fast configuration checks performed before startup.
    pub fn validate(&self) -> Result<()> {
        check_money("default_balance", self.default_balance)
            .map_err(|err| anyhow::anyhow!(err.message))?;
        if self.admin_password.is_some() || self.admin_token.is_some() {
            anyhow::ensure!(
                self.admin_username.is_some(),
                "admin_password/admin_token require admin_username"
            );
        }
        if let Some(username) = self.admin_username.as_ref() {
            anyhow::ensure!(
                self.admin_password.is_some(),
                "admin_username {username:?} requires admin_password"
            );
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "gymdesk", about = "Gym management web service", version)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "GYMDESK_BIND",
        value_name = "ADDR",
        help = "HTTP bind address"
    )]
    pub bind: Option<SocketAddr>,

    #[arg(
        long,
        env = "GYMDESK_DEFAULT_BALANCE",
        value_name = "AMOUNT",
        help = "Starting balance for newly registered clients",
        value_parser = clap::value_parser!(i64)
    )]
    pub default_balance: Option<i64>,

    #[arg(
        long,
        env = "GYMDESK_ADMIN_USER",
        value_name = "NAME",
        help = "Provision a superuser with this username at startup"
    )]
    pub admin_username: Option<String>,

    #[arg(
        long,
        env = "GYMDESK_ADMIN_PASSWORD",
        value_name = "PASSWORD",
        help = "Password for the bootstrap superuser"
    )]
    pub admin_password: Option<String>,

    #[arg(
        long,
        env = "GYMDESK_ADMIN_TOKEN",
        value_name = "TOKEN",
        help = "Fixed API token registered for the bootstrap superuser"
    )]
    pub admin_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    bind: Option<SocketAddr>,
    default_balance: Option<i64>,
    admin_username: Option<String>,
    admin_password: Option<String>,
    admin_token: Option<String>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
