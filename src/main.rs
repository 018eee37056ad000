//! Keeber - turn ergogen layout descriptions into ZMK and QMK firmware
//! sources.

use anyhow::Result;
use clap::{Parser, Subcommand};
use keeber::cli::{GenerateArgs, InspectArgs};
use tracing_subscriber::EnvFilter;

/// Keeber - keyboard layout to firmware source converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a layout document and report its geometry and matrix
    Inspect(InspectArgs),
    /// Generate ZMK and QMK firmware sources
    Generate(GenerateArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect(args) => args.execute(),
        Commands::Generate(args) => args.execute(),
    }
}
