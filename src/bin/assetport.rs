// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Assetport CLI
//!
//! Command-line front end for the conversion stages.
//!
//! ## Usage
//!
//! ```sh
//! # Pad mesh sections (SM_Rock.uexp is picked up automatically)
//! assetport pad SM_Rock.uasset --layout SM_Rock.layout.json
//!
//! # Swap the schema overlay of an exported document
//! assetport overlay SM_Rock.json --destination Augusta.usmap -o SM_Rock.out.json
//!
//! # Rebuild complete property type names
//! assetport fix-types SM_Rock.out.json --schema Augusta.usmap
//!
//! # Inspect a usmap file
//! assetport schema info Augusta.usmap
//! assetport schema lookup Augusta.usmap BodySetup DefaultInstance
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{FixTypesCmd, OverlayCmd, PadCmd, SchemaCmd};
use common::{Config, Result};
use tracing_subscriber::EnvFilter;

/// Assetport - retarget cooked static-mesh packages between schema versions
#[derive(Parser, Clone)]
#[command(name = "assetport")]
#[command(about = "Retarget cooked static-mesh packages between engine schema versions", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./assetport.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Insert padding before every static mesh section
    Pad(PadCmd),

    /// Swap a document's schema overlay and replace its collision field
    Overlay(OverlayCmd),

    /// Rebuild missing complete property type names
    FixTypes(FixTypesCmd),

    /// Usmap schema operations (info, lookup)
    #[command(subcommand)]
    Schema(SchemaCmd),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Pad(cmd) => cmd.run(&config),
        Commands::Overlay(cmd) => cmd.run(&config),
        Commands::FixTypes(cmd) => cmd.run(&config),
        Commands::Schema(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
