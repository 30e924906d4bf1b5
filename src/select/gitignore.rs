//! `.gitignore` integration
//!
//! Gitignore semantics are delegated to the `ignore` crate. The pipeline only
//! needs a yes/no answer per path, so the matcher sits behind a small trait
//! and any other implementation can be injected.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Answers whether a root-relative path is ignored
pub trait GitIgnoreMatcher: Send + Sync + std::fmt::Debug {
    fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool;
}

/// Matcher built from the root `.gitignore` and `.git/info/exclude`
#[derive(Debug)]
pub struct GitIgnoreFile {
    matcher: Gitignore,
}

impl GitIgnoreFile {
    /// Load ignore files found at `root`
    ///
    /// Unreadable files and malformed lines are logged and skipped; the
    /// result is always usable, possibly matching nothing.
    pub fn load(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        let mut loaded = 0;
        for candidate in [root.join(".gitignore"), root.join(".git/info/exclude")] {
            if !candidate.is_file() {
                continue;
            }
            if let Some(err) = builder.add(&candidate) {
                tracing::warn!("Problem reading {}: {}", candidate.display(), err);
            }
            loaded += 1;
        }
        tracing::debug!("Loaded {} gitignore file(s) from {}", loaded, root.display());
        Self::build(builder)
    }

    /// Build a matcher from in-memory gitignore lines
    pub fn from_lines<I, S>(root: &Path, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(root);
        for line in lines {
            if let Err(e) = builder.add_line(None, line.as_ref()) {
                tracing::warn!("Skipping gitignore line {:?}: {}", line.as_ref(), e);
            }
        }
        Self::build(builder)
    }

    pub fn len(&self) -> usize {
        self.matcher.num_ignores() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(builder: GitignoreBuilder) -> Self {
        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed gitignore rules: {}", e);
            Gitignore::empty()
        });
        Self { matcher }
    }
}

impl GitIgnoreMatcher for GitIgnoreFile {
    fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        if relative_path.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(Path::new(relative_path), is_dir)
            .is_ignore()
    }
}
