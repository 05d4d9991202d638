//! # Bingo Client - Main Entry Point
//!
//! WebSocket client for the multiworld bingo game. This entry point handles
//! CLI parsing, configuration loading, and application lifecycle management;
//! the reconciliation semantics live in the `bingo_session` crate.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! bingo-client
//!
//! # Specify custom configuration
//! bingo-client --config production.toml
//!
//! # Override specific settings
//! bingo-client --url ws://archipelago.gg:38281 --slot Player1 --log-level debug
//!
//! # JSON logging for unattended runs
//! bingo-client --json-logs
//! ```
//!
//! ## Configuration
//!
//! The client loads configuration from a TOML file (default: `config.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The client shuts down gracefully on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod signals;
mod transport;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the bingo client.
///
/// Handles the complete application lifecycle:
/// 1. Command-line argument parsing
/// 2. Configuration loading and validation
/// 3. Logging system initialization
/// 4. Application creation and execution
/// 5. Error handling and cleanup
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
#[tokio::main]
async fn main() {
    // Parse CLI arguments first
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("Failed to setup logging: {e}");
        std::process::exit(1);
    }

    // Create and run application
    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("Application error: {e:?}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }
}
