//! ECCANG client command-line tool.
//!
//! Run with: `eccang-client --config config.yaml --service getCountry`

use anyhow::{Context, Result};
use clap::Parser;
use eccang_client::{EccangClient, EccangConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Invoke a single ECCANG service and print the decoded result as JSON.
///
/// Credentials come from the config file or the `ECCANG_APP_TOKEN` and
/// `ECCANG_APP_KEY` environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Service name, e.g. getCountry or getTrackNumber
    #[arg(short, long)]
    service: String,

    /// Service parameters as JSON
    #[arg(short, long, default_value = "{}")]
    params: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the result
    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting ECCANG client v{}", env!("CARGO_PKG_VERSION"));

    let mut config = if args.config.exists() {
        let content = tokio::fs::read_to_string(&args.config)
            .await
            .context("Failed to read config file")?;
        serde_yaml::from_str(&content).context("Failed to parse config file")?
    } else {
        info!("Config file not found, using defaults");
        EccangConfig::default()
    };
    config.apply_env_overrides();

    info!(
        base_url = %config.endpoint.base_url,
        timeout_secs = config.endpoint.timeout_secs,
        audit = config.audit.enabled,
        "Configuration loaded"
    );

    let params: Value = serde_json::from_str(&args.params).context("Invalid --params JSON")?;
    let client = EccangClient::from_config(&config).context("Failed to create client")?;

    let result = client
        .call(&args.service, &params)
        .await
        .with_context(|| format!("Service {} failed", args.service))?;

    if !result.is_success() {
        info!(
            service = %args.service,
            ask = ?result.ask,
            message = ?result.error_message(),
            "Provider reported a failure"
        );
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
