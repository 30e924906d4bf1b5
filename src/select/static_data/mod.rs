//! Static shared data structures
//!
//! Curated tables used by the default rule set. Everything here is compiled
//! once behind a `LazyLock` and shared read-only across worker threads.

pub mod binary_extensions;
pub mod default_patterns;
pub mod ecosystems;
pub mod markers;

pub use binary_extensions::{BINARY_EXTENSIONS, is_binary_extension};
pub use default_patterns::{DEFAULT_ENTRY_POINT_PATTERNS, DEFAULT_EXCLUDE_PATTERNS};
pub use ecosystems::{ECOSYSTEM_TABLE, EcosystemEntry};
pub use markers::{GENERATED_MARKERS, LOCK_SIGNATURES};
