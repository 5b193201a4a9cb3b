use anyhow::Result;
use clap::Parser;

use gymdesk::{CliArgs, LoggingConfig, ServerConfig, init_logging, run_server};

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = init_logging(LoggingConfig::from_env())?;

    let args = CliArgs::parse();
    let config = ServerConfig::from_args(args)?;
    config.validate()?;

    run_server(config).await
}
