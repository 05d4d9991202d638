//! Command-line interface handling for the bingo client.
//!
//! This module provides command-line argument parsing and CLI interface
//! management using the `clap` crate for robust argument handling.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// This structure holds all the command-line options that can be used to
/// override configuration file settings or provide runtime parameters.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for the server WebSocket URL
    pub url: Option<String>,
    /// Optional override for the slot (player) name
    pub slot_name: Option<String>,
    /// Optional room password
    pub password: Option<String>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// Sets up the command-line interface with all available options and
    /// returns a structured representation of the parsed arguments.
    pub fn parse() -> Self {
        let matches = Command::new("Bingo Client")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Multiworld bingo client with server-authoritative board reconciliation")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("config.toml"),
            )
            .arg(
                Arg::new("url")
                    .short('u')
                    .long("url")
                    .value_name("URL")
                    .help("Server WebSocket URL (e.g., ws://archipelago.gg:38281)"),
            )
            .arg(
                Arg::new("slot")
                    .short('s')
                    .long("slot")
                    .value_name("NAME")
                    .help("Slot (player) name to connect as"),
            )
            .arg(
                Arg::new("password")
                    .short('p')
                    .long("password")
                    .value_name("PASSWORD")
                    .help("Room password, if the server requires one"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .get_matches();

        Self {
            config_path: PathBuf::from(
                matches
                    .get_one::<String>("config")
                    .expect("Default config path should always be set"),
            ),
            url: matches.get_one::<String>("url").cloned(),
            slot_name: matches.get_one::<String>("slot").cloned(),
            password: matches.get_one::<String>("password").cloned(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}
