//! Lectern CLI - static site generator for academic personal websites.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Static site generator for academic personal websites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter content directory
    Init {
        /// Directory to create
        #[arg(default_value = "content")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Content directory containing config.toml
        #[arg(default_value = ".")]
        content_dir: PathBuf,

        /// Theme to use instead of the configured one
        #[arg(short, long)]
        theme: Option<String>,

        /// Base URL for generated links
        #[arg(long)]
        base_url: Option<String>,

        /// Use relative URLs for local preview
        #[arg(long)]
        dev: bool,

        /// Log diagnostic build information
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let debug = cli.verbose || matches!(cli.command, Commands::Build { debug: true, .. });
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let ok = match cli.command {
        Commands::Init { dir, yes } => {
            commands::init::run(&dir, yes)?;
            true
        }
        Commands::Build {
            content_dir,
            theme,
            base_url,
            dev,
            debug,
        } => commands::build::run(&content_dir, theme.as_deref(), base_url.as_deref(), dev, debug),
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
