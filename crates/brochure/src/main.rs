//! Brochure CLI - minify and package a static brochure site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "brochure")]
#[command(about = "Minify and package a static brochure site")]
#[command(version)]
pub struct Cli {
    /// Defaults to `build` when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to brochure.toml config file
    #[arg(short, long, default_value = "brochure.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site into the output directory
    Build {
        /// Source directory (defaults to config or ".")
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Scaffold a site in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Preview a built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Build the site before serving it
        #[arg(short, long)]
        build: bool,
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

    fmt().with_env_filter(filter).with_target(false).init();

    let command = cli.command.unwrap_or(Commands::Build {
        source: None,
        output: None,
        no_minify: false,
    });

    match command {
        Commands::Build {
            source,
            output,
            no_minify,
        } => {
            let overrides = commands::build::Overrides {
                source,
                output,
                minify: if no_minify { Some(false) } else { None },
            };
            commands::build::run(&cli.config, overrides)?;
        }
        Commands::Init { yes } => {
            commands::init::run(&std::env::current_dir()?, yes)?;
        }
        Commands::Serve { port, dir, build } => {
            commands::serve::run(&cli.config, port, dir, build).await?;
        }
    }

    Ok(())
}
