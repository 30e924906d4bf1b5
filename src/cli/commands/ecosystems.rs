use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::{OutputFormat, RepoctxConfig};
use crate::select::{Ecosystem, EcosystemRegistry};

#[derive(Args, Debug)]
pub struct EcosystemsArgs {
    /// Directory to scan for manifests
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// How many directory levels to search
    #[arg(long)]
    pub depth: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct EcosystemReport {
    root: PathBuf,
    ecosystems: BTreeMap<Ecosystem, Vec<&'static str>>,
}

pub async fn execute(args: EcosystemsArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = RepoctxConfig::load(custom_config)?;
    if !args.path.is_dir() {
        bail!("Not a directory: {}", args.path.display());
    }

    let depth = args.depth.unwrap_or(config.engine.manifest_scan_depth);
    let registry = EcosystemRegistry::scan(&args.path, depth, config.filter.use_gitignore);
    let report = EcosystemReport {
        root: args.path.clone(),
        ecosystems: registry
            .lock_files_by_ecosystem()
            .into_iter()
            .map(|(ecosystem, locks)| (ecosystem, locks.to_vec()))
            .collect(),
    };

    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&report)?),
        OutputFormat::Text => {
            if report.ecosystems.is_empty() {
                output.info(&format!("No ecosystems detected under {}", args.path.display()));
            }
            for (ecosystem, locks) in &report.ecosystems {
                println!("{}: {}", ecosystem, locks.join(", "));
            }
        }
    }
    Ok(())
}
