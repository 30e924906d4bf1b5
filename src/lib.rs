//! # repoctx
//!
//! Picks the files of a codebase worth putting in a language model's context
//! window and packs them into a token budget.
//!
//! - [`select`]: the selection engine (rules, pipeline, relevance, budget)
//! - [`parallel`]: bounded, order-preserving parallel execution
//! - [`config`]: layered configuration
//! - [`cli`]: the `repoctx` command line

pub mod cli;
pub mod config;
pub mod parallel;
pub mod select;

pub use config::RepoctxConfig;
pub use select::{ExtractionResult, Extractor, SelectError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
