//! Non-fatal problems collected during a run

use serde::Serialize;
use std::fmt;

/// Warning generated during traversal or classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub path: String,
    pub category: WarningCategory,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    /// File content could not be read
    ReadFailed,
    /// File metadata could not be read
    MetadataFailed,
    /// Directory traversal hit an error
    WalkError,
    /// File is larger than the content limit
    TooLarge,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
