use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pullrefresh_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pullrefresh")]
#[command(author, version, about = "Pull-to-refresh demo for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Drive a scripted pull, release and refresh without a terminal
    Simulate {
        /// Print state changes as JSON lines
        #[arg(long)]
        json: bool,
        /// Simulated refresh latency in milliseconds (defaults to the config)
        #[arg(long = "latency-ms")]
        latency_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The TUI owns the terminal, so its logs go to a file
    let log_to_file = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, log_to_file)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate { json, latency_ms }) => {
            commands::simulate::run(config, json, latency_ms).await
        }
    }
}

fn init_logging(config: &AppConfig, log_to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if log_to_file {
        let path = config.log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
