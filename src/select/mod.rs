//! Content selection engine
//!
//! Decides which files under a root go into a model's context window:
//! traversal → staged filtering → relevance ranking → greedy token budget.
//!
//! ```rust,no_run
//! use repoctx::select::{EngineConfig, Extractor, FilterConfig};
//!
//! let filter = FilterConfig {
//!     relevance_keywords: vec!["auth".into()],
//!     token_budget: 8_000,
//!     ..Default::default()
//! };
//! let result = Extractor::new(".", filter, EngineConfig::default())?.run()?;
//! for file in &result.included {
//!     println!("{} ({} tokens)", file.relative_path, file.tokens);
//! }
//! # Ok::<(), repoctx::select::SelectError>(())
//! ```

pub mod budget;
pub mod cancel;
pub mod candidate;
pub mod config;
pub mod data;
pub mod ecosystem;
pub mod error;
pub mod extractor;
pub mod gitignore;
pub mod pipeline;
pub mod relevance;
pub mod rules;
pub mod static_data;
pub mod tokens;
pub mod walker;

pub use budget::{Allocation, Budget, EntryPointMatcher, TokenBudgetAllocator};
pub use cancel::CancellationToken;
pub use candidate::Candidate;
pub use config::{EngineConfig, FilterConfig};
pub use data::{
    ExcludedFile, ExtractionResult, IncludedFile, Rejection, SelectionStats, SelectionStatus,
    Warning, WarningCategory,
};
pub use ecosystem::{Ecosystem, EcosystemRegistry};
pub use error::SelectError;
pub use extractor::Extractor;
pub use gitignore::{GitIgnoreFile, GitIgnoreMatcher};
pub use pipeline::{FilterDecision, FilterPipeline, FilterStage, Verdict};
pub use relevance::{RelevanceScorer, ScoreBreakdown, ScoredFile};
pub use rules::{Rule, RuleAction, RuleKind};
pub use tokens::{ApproximateTokenCounter, TokenCounter};
