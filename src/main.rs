// watchgate - main.rs
// Loads configuration, installs the tracing subscriber and dispatches the CLI.

use clap::Parser;
use std::process::exit;

use watchgate::cli::{dispatch, Cli};
use watchgate::config_loader::load_config;

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("WATCHGATE_CONFIG").ok());

    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            exit(1);
        }
    };

    // validate() already checked the level parses
    let level = config.tracing_level().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(backend = ?config.backend, data_dir = %config.data_dir, "configuration loaded");

    if let Err(e) = dispatch(cli, config) {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
