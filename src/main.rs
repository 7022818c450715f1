//! Celforge CLI - custom song cel toolkit
//!
//! Command-line interface for the celforge data layer.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;

use celforge::cli::{commands, Cli, Commands};
use celforge::config::EditorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    debug!("Celforge v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => {
            let config = EditorConfig::load(&cli.config)
                .with_context(|| format!("loading config {}", cli.config.display()))?;
            handle_command(cmd, &cli.config, &config)
        }
        None => {
            println!("Celforge v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config_path: &Path, config: &EditorConfig) -> Result<()> {
    match cmd {
        Commands::Fmt { file, check } => commands::fmt(&file, check),
        Commands::Inspect { file } => commands::inspect(&file, config),
        Commands::Migrate {
            file,
            advanced,
            audio,
            split_single_zone,
        } => commands::migrate(&file, advanced, &audio, split_single_zone),
        Commands::Check { dir } => commands::check(&dir),
        Commands::ConvertChords {
            midi,
            to,
            swap,
            output,
        } => commands::convert_chords(&midi, to.into(), swap, output.as_deref(), config),
        Commands::SyncLength {
            major,
            minor,
            length,
        } => commands::sync_length(&major, &minor, length),
        Commands::ShowConfig => commands::show_config(config_path, config),
    }
}
