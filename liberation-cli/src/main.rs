//! liberation: operator CLI for the liberation engine
//!
//! Loads the service configuration, then runs one engine computation on JSON
//! input and prints the result as JSON. Intended for policy audits and manual
//! checks, not for serving traffic.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use journey_services::{JourneyServices, ServicesConfig};
use tracing::info;

use commands::Commands;

#[derive(Parser)]
#[command(name = "liberation")]
#[command(about = "Liberation values validation and journey progression engine")]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, env = "LIBERATION_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(long, env = "LIBERATION_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("liberation={}", level).parse()?)
                .add_directive(format!("journey_services={}", level).parse()?)
                .add_directive(format!("liberation_cli={}", level).parse()?),
        )
        .init();

    info!(
        config = ?cli.config,
        policy = %config.policy.fingerprint(),
        "Starting liberation"
    );

    let policy = config.policy.clone();
    let services = JourneyServices::new(config);
    let output = commands::execute(&services, &policy, cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServicesConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ServicesConfig::from_yaml(&content)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(ServicesConfig::default()),
    }
}
