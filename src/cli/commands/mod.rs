use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::Output;

pub mod config;
pub mod ecosystems;
pub mod extract;

#[derive(Parser)]
#[command(
    name = "repoctx",
    version = env!("CARGO_PKG_VERSION"),
    about = "Select the files of a codebase that fit in a model's context window",
    long_about = "repoctx walks a directory, drops noise (ignored, vendored, binary, generated \
                  and lock files), ranks what is left by keyword relevance and packs it into \
                  a token budget."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select files under a directory and print them
    Extract(extract::ExtractArgs),
    /// Show package-manager ecosystems detected under a directory
    Ecosystems(ecosystems::EcosystemsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Extract(args)) => {
                extract::execute(args, self.config.as_deref(), &output).await
            }
            Some(Commands::Ecosystems(args)) => {
                ecosystems::execute(args, self.config.as_deref(), &output).await
            }
            Some(Commands::Config(args)) => {
                config::execute(args, self.config.as_deref(), &output).await
            }
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // A second init (tests driving `run` twice) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
