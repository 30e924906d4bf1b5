use super::RuleAction;
use crate::select::candidate::basename;
use crate::select::error::SelectError;
use globset::{Glob, GlobMatcher};

/// Path-pattern rule over `/`-separated relative paths
///
/// Each pattern is interpreted by its shape:
/// - trailing `/`: a directory name, matched at the start of the path or after any `/`
/// - contains `*`: a glob matched against the basename only
/// - anything else: loose match by prefix, `/`-prefixed substring, or equality
///
/// The loose form is permissive on purpose: `README` also matches `README.md`.
#[derive(Debug, Clone)]
pub struct PatternRule {
    patterns: Vec<CompiledPattern>,
    action: RuleAction,
}

#[derive(Debug, Clone)]
enum CompiledPattern {
    Directory(String),
    Glob(GlobMatcher),
    Loose(String),
}

impl PatternRule {
    /// Compile patterns; an invalid glob fails the whole rule
    pub fn new<I, S>(patterns: I, action: RuleAction) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let normalized = normalize_pattern(raw.as_ref());
            if normalized.is_empty() {
                continue;
            }

            let pattern = if normalized.ends_with('/') {
                CompiledPattern::Directory(normalized)
            } else if normalized.contains('*') {
                let glob = Glob::new(&normalized)
                    .map_err(|e| SelectError::invalid_pattern(raw.as_ref(), e))?;
                CompiledPattern::Glob(glob.compile_matcher())
            } else {
                CompiledPattern::Loose(normalized)
            };
            compiled.push(pattern);
        }

        Ok(Self {
            patterns: compiled,
            action,
        })
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Test a `/`-separated path relative to the root
    pub fn matches(&self, relative_path: &str) -> bool {
        let path = relative_path.replace('\\', "/");
        let name = basename(&path);

        self.patterns.iter().any(|pattern| match pattern {
            CompiledPattern::Directory(dir) => {
                path.starts_with(dir.as_str()) || path.contains(&format!("/{dir}"))
            }
            CompiledPattern::Glob(glob) => glob.is_match(name),
            CompiledPattern::Loose(text) => {
                path == *text
                    || path.starts_with(text.as_str())
                    || path.contains(&format!("/{text}"))
            }
        })
    }

    /// Whether every file below `relative_dir` would match a directory pattern
    ///
    /// Only trailing-`/` patterns take part, so pruning on this answer never
    /// changes which files the rule matches.
    pub fn matches_directory(&self, relative_dir: &str) -> bool {
        let dir = format!("{}/", relative_dir.replace('\\', "/").trim_end_matches('/'));

        self.patterns.iter().any(|pattern| match pattern {
            CompiledPattern::Directory(pattern) => {
                dir.starts_with(pattern.as_str()) || dir.contains(&format!("/{pattern}"))
            }
            _ => false,
        })
    }
}

fn normalize_pattern(raw: &str) -> String {
    let pattern = raw.trim().replace('\\', "/");
    let pattern = pattern.strip_prefix("./").unwrap_or(&pattern);
    pattern.trim_start_matches('/').to_string()
}
