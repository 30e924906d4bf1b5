use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use std::path::Path;

use crate::cli::Output;
use crate::config::{ConfigFormat, RepoctxConfig};

const PROJECT_CONFIG: &str = "repoctx.toml";

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write the default configuration to ./repoctx.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Display the merged configuration
    Show {
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Print one configuration value, e.g. `filter.token_budget`
    Get { key: String },
    /// Check that every configuration layer parses
    Validate,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = Path::new(PROJECT_CONFIG);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", PROJECT_CONFIG);
            }
            std::fs::write(path, crate::config::core::DEFAULT_CONFIG)?;
            output.success(&format!("Created {PROJECT_CONFIG} with default settings"));
        }
        ConfigCommand::Show { format } => {
            let config = RepoctxConfig::load(custom_config)?;
            print!("{}", config.export(format)?);
        }
        ConfigCommand::Get { key } => {
            let figment = RepoctxConfig::figment(custom_config)?;
            let value: serde_json::Value = match figment.extract_inner(&key) {
                Ok(value) => value,
                Err(_) => bail!("Configuration key '{}' not found", key),
            };
            match value {
                serde_json::Value::String(s) => println!("{s}"),
                serde_json::Value::Array(items) => {
                    for item in items {
                        match item {
                            serde_json::Value::String(s) => println!("{s}"),
                            other => println!("{other}"),
                        }
                    }
                }
                serde_json::Value::Object(_) => println!("{}", serde_json::to_string_pretty(&value)?),
                other => println!("{other}"),
            }
        }
        ConfigCommand::Validate => match RepoctxConfig::load(custom_config) {
            Ok(_) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&format!("Invalid configuration: {e:#}"));
                bail!("Configuration validation failed");
            }
        },
    }
    Ok(())
}
