//! quill CLI - blog content pipeline with code fence filenames.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Blog content pipeline with code fence filenames and themed highlighting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to quill.toml config file
    #[arg(short, long, default_value = "quill.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create quill.toml and a sample post
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build every post in the content directory
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include posts marked as drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Render a single document to stdout
    Render {
        /// Markdown or MDX file
        file: PathBuf,
    },

    /// Print a theme definition as TOML
    Theme {
        /// Theme name (defaults to the configured theme)
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build { output, drafts } => {
            commands::build::run(&cli.config, output, drafts).await?;
        }
        Commands::Render { file } => {
            commands::render::run(&cli.config, &file).await?;
        }
        Commands::Theme { name } => {
            commands::theme::run(&cli.config, name.as_deref()).await?;
        }
    }

    Ok(())
}
