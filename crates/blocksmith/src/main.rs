//! blocksmith CLI - builds static per-block pages for the site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "blocksmith")]
#[command(about = "Builds one static page per block record")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default site.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the block pages (the default command)
    Build(commands::build::BuildArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries only the build summary
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Some(Commands::Init { yes }) => {
            commands::init::run(&cli.config, yes)?;
        }
        Some(Commands::Build(args)) => {
            commands::build::run(&cli.config, &args)?;
        }
        None => {
            commands::build::run(&cli.config, &commands::build::BuildArgs::default())?;
        }
    }

    Ok(())
}
