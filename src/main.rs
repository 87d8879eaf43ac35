//! Quire - a static blog generator with a `build_complete` live-reload loop.

mod actor;
mod cli;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod reload;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::run(&config),
        Commands::Serve { .. } => cli::serve::run(config),
        Commands::Listen { url, exec } => {
            cli::listen::run(&config, url.as_deref(), exec.as_deref())
        }
    }
}
