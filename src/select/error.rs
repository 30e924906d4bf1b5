//! Typed errors for the selection engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running a selection
#[derive(Debug, Error)]
pub enum SelectError {
    /// Root path is missing or not a directory
    #[error("invalid root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// A user-supplied glob failed to compile
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Every candidate was rejected by the filter stages
    #[error("no files matched the configured filters")]
    NoFilesMatched,

    /// Candidates survived filtering but each one alone exceeds the budget
    #[error("token budget of {max_tokens} is too low: smallest candidate needs {smallest_candidate} tokens")]
    BudgetTooLow {
        max_tokens: usize,
        smallest_candidate: usize,
    },

    /// The run was cancelled before allocation started
    #[error("selection cancelled")]
    Cancelled,

    /// The run exceeded its deadline before allocation started
    #[error("selection timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    /// The classification worker pool could not be built
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl SelectError {
    pub fn invalid_pattern(pattern: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SelectError::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }
}
