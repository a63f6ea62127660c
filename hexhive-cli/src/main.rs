//! HEXHIVE CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the HTTP game server
//! - selfplay: Play seeded random games and check engine invariants
//! - replay: Step through a saved game record

mod replay;
mod selfplay;
mod server;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hexhive_core::Rules;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexhive")]
#[command(about = "HEXHIVE hex-stacking bug game engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP game server
    Serve(server::ServerArgs),
    /// Play seeded random games
    Selfplay(selfplay::SelfplayArgs),
    /// Replay a saved game record
    Replay(replay::ReplayArgs),
}

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Selfplay(args) => selfplay::run(args),
        Commands::Replay(args) => replay::run(args),
    }
}

/// Rules from a JSON file or preset name, or the standard rules
pub(crate) fn load_rules(path: Option<&Path>) -> Result<Rules> {
    match path {
        Some(path) => Rules::load(path)
            .with_context(|| format!("Failed to load rules: {}", path.display())),
        None => Ok(Rules::default()),
    }
}
