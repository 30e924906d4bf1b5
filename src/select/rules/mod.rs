//! Classification rules
//!
//! Every rule answers one question about a candidate: does it match? The set
//! of rule kinds is closed, so rules are a sum type rather than trait objects;
//! the pipeline walks them in a fixed, cheapest-first order.
//!
//! ## Default exclude set
//!
//! Composed in confidence order, any single match excludes the file:
//! 1. **Pattern** - default directory and file-name patterns (no I/O)
//! 2. **LockSignature** - basename mentions "lock" and content carries lock-file tokens
//! 3. **EcosystemLock** - lock files of ecosystems detected at the root
//! 4. **Generated** - generated-code markers or highly repetitive content
//! 5. **Binary** - extension, size, then a 512 byte content sample

mod binary;
mod ecosystem_lock;
mod extension;
mod generated;
mod lock_signature;
mod pattern;

pub use binary::{BinaryRule, looks_binary};
pub use ecosystem_lock::EcosystemLockDetector;
pub use extension::{ExtensionRule, normalize_extension};
pub use generated::{GeneratedFileDetector, duplicate_line_ratio, normalize_line};
pub use lock_signature::LockSignatureDetector;
pub use pattern::PatternRule;

use crate::select::candidate::Candidate;
use crate::select::ecosystem::EcosystemRegistry;
use crate::select::error::SelectError;
use crate::select::static_data::DEFAULT_EXCLUDE_PATTERNS;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// What a matching rule asks the pipeline to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Include,
    Exclude,
    Skip,
}

/// Discriminant of a `Rule`, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Pattern,
    Extension,
    Binary,
    EcosystemLock,
    Generated,
    LockSignature,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Pattern => "pattern",
            RuleKind::Extension => "extension",
            RuleKind::Binary => "binary",
            RuleKind::EcosystemLock => "ecosystem lock file",
            RuleKind::Generated => "generated file",
            RuleKind::LockSignature => "lock file signature",
        };
        f.write_str(name)
    }
}

/// A single immutable classification rule
#[derive(Debug, Clone)]
pub enum Rule {
    Pattern(PatternRule),
    Extension(ExtensionRule),
    Binary(BinaryRule),
    EcosystemLock(EcosystemLockDetector),
    Generated(GeneratedFileDetector),
    LockSignature(LockSignatureDetector),
}

impl Rule {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        match self {
            Rule::Pattern(rule) => rule.matches(candidate.relative_path()),
            Rule::Extension(rule) => rule.matches(candidate.extension()),
            Rule::Binary(rule) => rule.matches(candidate),
            Rule::EcosystemLock(rule) => rule.matches(candidate),
            Rule::Generated(rule) => rule.matches(candidate),
            Rule::LockSignature(rule) => rule.matches(candidate),
        }
    }

    pub fn action(&self) -> RuleAction {
        match self {
            Rule::Pattern(rule) => rule.action(),
            Rule::Extension(rule) => rule.action(),
            Rule::Binary(_)
            | Rule::EcosystemLock(_)
            | Rule::Generated(_)
            | Rule::LockSignature(_) => RuleAction::Exclude,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Pattern(_) => RuleKind::Pattern,
            Rule::Extension(_) => RuleKind::Extension,
            Rule::Binary(_) => RuleKind::Binary,
            Rule::EcosystemLock(_) => RuleKind::EcosystemLock,
            Rule::Generated(_) => RuleKind::Generated,
            Rule::LockSignature(_) => RuleKind::LockSignature,
        }
    }
}

/// Tunable thresholds for the content heuristics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicSettings {
    pub binary_size_threshold: u64,
    pub binary_sample_bytes: usize,
    pub binary_nonprintable_ratio: f64,
    pub generated_size_threshold: u64,
    pub generated_min_lines: usize,
    pub generated_duplicate_ratio: f64,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            binary_size_threshold: 10 * 1024 * 1024,
            binary_sample_bytes: 512,
            binary_nonprintable_ratio: 0.30,
            generated_size_threshold: 1024 * 1024,
            generated_min_lines: 40,
            generated_duplicate_ratio: 0.6,
        }
    }
}

/// Build the default exclude set in confidence order
pub fn default_rules(
    settings: &HeuristicSettings,
    registry: Arc<EcosystemRegistry>,
) -> Result<Vec<Rule>, SelectError> {
    Ok(vec![
        Rule::Pattern(PatternRule::new(DEFAULT_EXCLUDE_PATTERNS, RuleAction::Exclude)?),
        Rule::LockSignature(LockSignatureDetector::new()),
        Rule::EcosystemLock(EcosystemLockDetector::new(registry)),
        Rule::Generated(GeneratedFileDetector::new(
            settings.generated_size_threshold,
            settings.generated_min_lines,
            settings.generated_duplicate_ratio,
        )),
        Rule::Binary(binary_rule(settings)),
    ])
}

/// Binary detector, active even when the rest of the default set is off
pub fn binary_rule(settings: &HeuristicSettings) -> BinaryRule {
    BinaryRule::new(
        settings.binary_size_threshold,
        settings.binary_sample_bytes,
        settings.binary_nonprintable_ratio,
    )
}
