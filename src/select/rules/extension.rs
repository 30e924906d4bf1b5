use super::RuleAction;
use std::collections::BTreeSet;

/// Extension rule with case-sensitive, dot-prefixed comparison
///
/// Extensions are normalized to carry a leading `.` so `rs` and `.rs` are the
/// same entry. A file without an extension never matches.
#[derive(Debug, Clone)]
pub struct ExtensionRule {
    extensions: BTreeSet<String>,
    action: RuleAction,
}

impl ExtensionRule {
    pub fn new<I, S>(extensions: I, action: RuleAction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| ext.len() > 1)
            .collect();
        Self { extensions, action }
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Test a candidate's dot-prefixed extension
    pub fn matches(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| self.extensions.contains(ext))
    }
}

/// Add the leading dot if missing
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_normalization() {
        let rule = ExtensionRule::new(["rs", ".py"], RuleAction::Include);
        assert!(rule.matches(Some(".rs")));
        assert!(rule.matches(Some(".py")));
        assert!(!rule.matches(Some(".go")));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let rule = ExtensionRule::new([".rs"], RuleAction::Include);
        assert!(!rule.matches(Some(".RS")));
    }

    #[test]
    fn test_no_extension_never_matches() {
        let rule = ExtensionRule::new([".rs", ""], RuleAction::Include);
        assert!(!rule.matches(None));
        assert_eq!(rule.extensions().collect::<Vec<_>>(), vec![".rs"]);
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let rule = ExtensionRule::new(["", "."], RuleAction::Include);
        assert!(rule.is_empty());
    }
}
