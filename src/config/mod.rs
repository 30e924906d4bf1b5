//! Application configuration
//!
//! Selection settings live in `select::config`; this module layers them with
//! output preferences and loads the result through figment.

pub mod core;

use crate::select::{EngineConfig, FilterConfig};
use serde::{Deserialize, Serialize};

pub use self::core::ConfigFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoctxConfig {
    pub filter: FilterConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_excluded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}
