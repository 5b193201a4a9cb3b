//! Structured logging setup.
//!
//! JSON formatting for production, pretty formatting for development,
//! optional file output with rotation. Driven by environment variables so
//! deployments can switch formats without a rebuild.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub output: LogOutput,
    /// Directory for log files (when output is "file").
    pub log_dir: PathBuf,
    pub log_file_prefix: String,
    pub environment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging (production).
    Json,
    /// Human-readable output (development).
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production" || environment == "prod";

        Self {
            format: if is_production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            output: LogOutput::Stderr,
            log_dir: PathBuf::from("logs"),
            log_file_prefix: "gymdesk".to_string(),
            environment,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(format) = env::var("GYMDESK_LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            };
        }
        if let Ok(output) = env::var("GYMDESK_LOG_OUTPUT") {
            config.output = match output.to_lowercase().as_str() {
                "stdout" => LogOutput::Stdout,
                "file" => LogOutput::File,
                _ => LogOutput::Stderr,
            };
        }
        if let Ok(dir) = env::var("GYMDESK_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        config
    }
}

/// Initializes the global subscriber. The returned guard must be kept alive
/// for the lifetime of the process when file output is enabled.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid RUST_LOG filter")?;

    match config.output {
        LogOutput::File => {
            std::fs::create_dir_all(&config.log_dir)
                .with_context(|| format!("failed to create log dir {:?}", config.log_dir))?;
            let appender =
                tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let registry = tracing_subscriber::registry().with(filter);
            match config.format {
                LogFormat::Json => registry
                    .with(fmt::layer().json().with_writer(writer))
                    .try_init(),
                LogFormat::Pretty => registry
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .try_init(),
            }
            .map_err(|err| anyhow::anyhow!("failed to init logging: {err}"))?;
            Ok(Some(guard))
        }
        LogOutput::Stdout => {
            init_console(config.format, fmt::writer::BoxMakeWriter::new(std::io::stdout), filter)?;
            Ok(None)
        }
        LogOutput::Stderr => {
            init_console(config.format, fmt::writer::BoxMakeWriter::new(std::io::stderr), filter)?;
            Ok(None)
        }
    }
}

fn init_console(
    format: LogFormat,
    writer: fmt::writer::BoxMakeWriter,
    filter: EnvFilter,
) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(writer)).try_init(),
    }
    .map_err(|err| anyhow::anyhow!("failed to init logging: {err}"))
}
