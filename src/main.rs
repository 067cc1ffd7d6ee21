//! ChatHub Server: real-time message fanout for the chat backend.
//!
//! Main entry point that loads configuration, sets up logging, and starts
//! the server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use chathub_core::config::AppConfig;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "chathub-server", version, about = "Real-time fanout hub for ChatHub")]
struct Args {
    /// Environment overlay loaded after `default.toml` (e.g. `development`).
    #[arg(long, env = "CHATHUB_ENV", default_value = "development")]
    env: String,

    /// Directory holding the TOML configuration files.
    #[arg(long, env = "CHATHUB_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.config_dir, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(
        env = %args.env,
        config_dir = %args.config_dir.display(),
        "Starting ChatHub v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = chathub_api::app::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
