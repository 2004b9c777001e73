//! Command-line front end for the list logger.
//!
//! ```text
//! list-logger --config list-logger.toml log error "payment failed" --field order=42
//! list-logger --config list-logger.toml page --page 1 --limit 10
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use list_logger::config::{load_config, LoggerConfig};
use list_logger::observability::{logging, metrics};
use list_logger::{Level, LogRecord, Logger};

#[derive(Parser)]
#[command(name = "list-logger", version)]
#[command(about = "Structured logging into a list-backed store", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when missing)
    #[arg(short, long, default_value = "./list-logger.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one record through the configured sinks
    Log {
        level: String,
        message: String,
        /// Extra field as key=value; values are parsed as JSON when possible
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
        /// Stack trace text, one frame per line
        #[arg(long)]
        stack: Option<String>,
    },
    /// Print one page of persisted entries as JSON
    Page {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        LoggerConfig::default()
    };

    logging::init(&config.observability.log_level, None);
    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let logger = Logger::connect(config).await?;

    match cli.command {
        Commands::Log {
            level,
            message,
            fields,
            stack,
        } => {
            let level: Level = level.parse()?;
            let mut record = LogRecord::new(level, message);
            for (key, value) in fields {
                record = record.with_field(key, value);
            }
            if let Some(stack) = stack {
                record = record.with_stack(stack);
            }
            logger.log(record);
            logger.flush().await;
        }
        Commands::Page { page, limit } => {
            let page = logger.paginated(page, limit).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
