//! Per-run selection settings
//!
//! `FilterConfig` says what to select; `EngineConfig` holds the tuning knobs
//! behind the heuristics, traversal and worker pool. Both are immutable for
//! the duration of one extraction.

use crate::select::rules::HeuristicSettings;
use crate::select::static_data::DEFAULT_ENTRY_POINT_PATTERNS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Extension allow-list; `None` or empty admits every extension
    pub include_extensions: Option<BTreeSet<String>>,
    pub exclude_patterns: Vec<String>,
    pub use_gitignore: bool,
    pub use_default_rules: bool,
    /// Keywords for the relevance gate; empty disables it
    pub relevance_keywords: Vec<String>,
    /// 0 means unlimited
    pub token_budget: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_extensions: None,
            exclude_patterns: Vec::new(),
            use_gitignore: true,
            use_default_rules: true,
            relevance_keywords: Vec::new(),
            token_budget: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_file_size_mb: u64,
    pub follow_symlinks: bool,
    pub binary_size_threshold_mb: u64,
    pub binary_sample_bytes: usize,
    pub binary_nonprintable_ratio: f64,
    pub generated_size_threshold_kb: u64,
    pub generated_min_lines: usize,
    pub generated_duplicate_ratio: f64,
    pub manifest_scan_depth: usize,
    pub prioritize_entry_points: bool,
    pub entry_point_patterns: Vec<String>,
    pub chars_per_token: usize,
    pub max_threads: usize,
    pub thread_percentage: u8,
    pub min_files_for_parallel: usize,
    /// 0 means no timeout
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            follow_symlinks: false,
            binary_size_threshold_mb: 10,
            binary_sample_bytes: 512,
            binary_nonprintable_ratio: 0.30,
            generated_size_threshold_kb: 1024,
            generated_min_lines: 40,
            generated_duplicate_ratio: 0.6,
            manifest_scan_depth: 4,
            prioritize_entry_points: false,
            entry_point_patterns: DEFAULT_ENTRY_POINT_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            chars_per_token: 4,
            max_threads: 0,
            thread_percentage: 75,
            min_files_for_parallel: 16,
            timeout_secs: 0,
        }
    }
}

impl EngineConfig {
    pub fn heuristics(&self) -> HeuristicSettings {
        HeuristicSettings {
            binary_size_threshold: self.binary_size_threshold_mb * 1024 * 1024,
            binary_sample_bytes: self.binary_sample_bytes,
            binary_nonprintable_ratio: self.binary_nonprintable_ratio,
            generated_size_threshold: self.generated_size_threshold_kb * 1024,
            generated_min_lines: self.generated_min_lines,
            generated_duplicate_ratio: self.generated_duplicate_ratio,
        }
    }

    /// Files above this are never read into memory
    pub fn max_content_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
