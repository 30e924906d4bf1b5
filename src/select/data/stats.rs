//! Statistics for selection runs

use crate::select::pipeline::FilterStage;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Overall selection statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    // Traversal stats
    pub files_discovered: usize,
    pub directories_traversed: usize,

    // Filter stats
    pub filtered_by_gitignore: usize,
    pub filtered_by_default_rules: usize,
    pub filtered_by_custom_exclude: usize,
    pub filtered_by_extension: usize,
    pub filtered_by_relevance: usize,
    pub files_unreadable: usize,

    // Allocation stats
    pub files_selected: usize,
    pub files_included: usize,
    pub files_over_budget: usize,

    pub duration_ms: u64,
}

impl SelectionStats {
    /// Total files rejected by any filter stage
    pub fn files_filtered(&self) -> usize {
        self.filtered_by_gitignore
            + self.filtered_by_default_rules
            + self.filtered_by_custom_exclude
            + self.filtered_by_extension
            + self.filtered_by_relevance
    }
}

/// Thread-safe statistics collector for parallel classification
#[derive(Debug, Default)]
pub struct StatsCollector {
    files_discovered: AtomicUsize,
    directories_traversed: AtomicUsize,
    filtered_by_gitignore: AtomicUsize,
    filtered_by_default_rules: AtomicUsize,
    filtered_by_custom_exclude: AtomicUsize,
    filtered_by_extension: AtomicUsize,
    filtered_by_relevance: AtomicUsize,
    files_unreadable: AtomicUsize,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_files_discovered(&self) {
        self.files_discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_directories_traversed(&self) {
        self.directories_traversed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_unreadable(&self) {
        self.files_unreadable.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rejection against the stage that made it
    pub fn record_rejection(&self, stage: FilterStage) {
        let counter = match stage {
            FilterStage::GitIgnore => &self.filtered_by_gitignore,
            FilterStage::DefaultRule(_) => &self.filtered_by_default_rules,
            FilterStage::CustomExclude => &self.filtered_by_custom_exclude,
            FilterStage::ExtensionAllowList => &self.filtered_by_extension,
            FilterStage::Relevance => &self.filtered_by_relevance,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters; allocation figures are filled in by the caller
    pub fn to_stats(&self) -> SelectionStats {
        SelectionStats {
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            directories_traversed: self.directories_traversed.load(Ordering::Relaxed),
            filtered_by_gitignore: self.filtered_by_gitignore.load(Ordering::Relaxed),
            filtered_by_default_rules: self.filtered_by_default_rules.load(Ordering::Relaxed),
            filtered_by_custom_exclude: self.filtered_by_custom_exclude.load(Ordering::Relaxed),
            filtered_by_extension: self.filtered_by_extension.load(Ordering::Relaxed),
            filtered_by_relevance: self.filtered_by_relevance.load(Ordering::Relaxed),
            files_unreadable: self.files_unreadable.load(Ordering::Relaxed),
            ..SelectionStats::default()
        }
    }
}
