//! # vellum CLI
//!
//! Command-line interface for the vellum content pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "vellum.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all collections once and write the data directory
    Build {
        /// Keep prior output instead of cleaning it first
        #[arg(long)]
        no_clean: bool,

        /// Include draft posts in aggregation (development mode)
        #[arg(long)]
        drafts: bool,
    },

    /// Rebuild collections whenever the content directory changes
    Watch,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { no_clean, drafts } => commands::build(&cli.config, !no_clean, drafts),
        Commands::Watch => commands::watch(&cli.config),
    }
}
