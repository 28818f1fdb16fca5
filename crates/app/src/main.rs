mod payload;
mod server;

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::OffsetTime;
use venue_config::Config;
use venue_models::{ReservationStatus, ValidationLimits};

use crate::payload::PayloadKind;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_HASH: &str = env!("VENUE_GIT_HASH");

fn version_string() -> String {
    format!("{VERSION} ({GIT_HASH})")
}

// --- CLI definition ---

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "venue")]
#[command(about = "Venue booking schema tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VENUE_GIT_HASH"), ")"))]
struct Cli {
    /// Log level (default: from config, else info)
    #[arg(short, long, global = true)]
    log_level: Option<LogLevel>,

    /// Display log timestamps in UTC (default: local time)
    #[arg(long, global = true)]
    utc: bool,

    /// Config file (default: ~/.venue/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (default: from config, else 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check a JSON payload against its schema and invariants
    Check {
        /// Payload kind
        kind: PayloadKind,
        /// JSON file to read (default: stdin)
        file: Option<PathBuf>,
        /// Print the payload in canonical form when it is valid
        #[arg(long)]
        normalize: bool,
    },
    /// Print a well-formed sample payload
    Sample {
        /// Payload kind
        kind: PayloadKind,
    },
    /// List reservation status labels
    Statuses,
}

// --- Logging ---

fn init_logging(level: &str, utc: bool) {
    let filter = EnvFilter::new(level);

    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_timer(OffsetTime::new(
                time::UtcOffset::UTC,
                time::macros::format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                ),
            ))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_timer(LocalTimer)
            .init();
    }
}

struct LocalTimer;

impl tracing_subscriber::fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

// --- Commands ---

fn read_payload(file: Option<&PathBuf>) -> anyhow::Result<serde_json::Value> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("payload is not JSON")
}

fn run_check(
    kind: PayloadKind,
    file: Option<&PathBuf>,
    normalize: bool,
    limits: &ValidationLimits,
) -> anyhow::Result<()> {
    let value = read_payload(file)?;
    let normalized = payload::check(kind, value, limits)?;
    info!("{kind} payload is valid");
    if normalize {
        println!("{}", serde_json::to_string_pretty(&normalized)?);
    } else {
        println!("ok");
    }
    Ok(())
}

// --- Main ---

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let log_level = cli
        .log_level
        .as_ref()
        .map_or_else(|| config.log_level.clone(), LogLevel::to_string);
    init_logging(&log_level, cli.utc || config.utc);
    debug!("Loaded config: {config:?}");

    let limits = ValidationLimits {
        pin_length: config.pin_length,
        max_party_size: config.max_party_size,
    };

    match cli.command {
        Commands::Serve { port } => {
            server::run_server(port.unwrap_or(config.port), limits).await?;
        }
        Commands::Check { kind, file, normalize } => {
            run_check(kind, file.as_ref(), normalize, &limits)?;
        }
        Commands::Sample { kind } => {
            println!("{}", serde_json::to_string_pretty(&payload::sample(kind))?);
        }
        Commands::Statuses => {
            for status in ReservationStatus::ALL {
                println!("{status}");
            }
        }
    }

    Ok(())
}
