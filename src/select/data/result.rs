//! Final output of a selection run

use super::{SelectionStats, Warning};
use crate::select::error::SelectError;
use crate::select::pipeline::FilterStage;
use crate::select::relevance::ScoreBreakdown;
use serde::Serialize;
use std::path::PathBuf;

/// A file that made it into the output, in priority order
#[derive(Debug, Clone, Serialize)]
pub struct IncludedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub content: String,
    pub tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

/// A file that passed filtering but did not fit in the token budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedFile {
    pub relative_path: String,
    pub tokens: usize,
}

/// A file rejected by one of the filter stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub relative_path: String,
    pub stage: FilterStage,
}

/// Why a result is (or is not) empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// At least one file was included
    Selected,
    /// No candidate survived the filter stages
    NoFilesMatched,
    /// Candidates survived filtering but none fits in the budget
    BudgetTooLow,
}

/// Result of one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub root: PathBuf,
    pub included: Vec<IncludedFile>,
    pub excluded: Vec<ExcludedFile>,
    pub rejected: Vec<Rejection>,
    /// Sum of included token costs
    pub token_count: usize,
    /// Sum of token costs of every selected candidate, regardless of budget
    pub total_tokens: usize,
    /// Budget the run was allocated against, 0 meaning unlimited
    pub max_tokens: usize,
    pub warnings: Vec<Warning>,
    pub stats: SelectionStats,
}

impl ExtractionResult {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn status(&self) -> SelectionStatus {
        if !self.included.is_empty() {
            SelectionStatus::Selected
        } else if self.excluded.is_empty() {
            SelectionStatus::NoFilesMatched
        } else {
            SelectionStatus::BudgetTooLow
        }
    }

    /// Share of the selected tokens that fit in the budget (1.0 when nothing was selected)
    pub fn efficiency(&self) -> f64 {
        if self.total_tokens == 0 {
            return 1.0;
        }
        self.token_count as f64 / self.total_tokens as f64
    }

    /// Turn an empty result into the matching error
    pub fn into_selected(self) -> Result<Self, SelectError> {
        match self.status() {
            SelectionStatus::Selected => Ok(self),
            SelectionStatus::NoFilesMatched => Err(SelectError::NoFilesMatched),
            SelectionStatus::BudgetTooLow => Err(SelectError::BudgetTooLow {
                max_tokens: self.max_tokens,
                smallest_candidate: self
                    .excluded
                    .iter()
                    .map(|file| file.tokens)
                    .min()
                    .unwrap_or_default(),
            }),
        }
    }
}
