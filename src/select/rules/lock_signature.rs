use crate::select::candidate::Candidate;
use crate::select::static_data::LOCK_SIGNATURES;
use aho_corasick::AhoCorasick;
use std::sync::LazyLock;

static SIGNATURES: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(LOCK_SIGNATURES)
        .expect("Failed to compile lock-file signatures")
});

const COMMENT_PREFIXES: &[&str] = &["#", "//", ";", "--", "<!--"];

/// Lock-file detection independent of ecosystem context
///
/// Flags a file whose basename contains "lock" and whose content carries a
/// known lock-file token or opens with a comment calling itself a lockfile.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockSignatureDetector;

impl LockSignatureDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if !candidate.file_name().to_ascii_lowercase().contains("lock") {
            return false;
        }
        let Some(content) = candidate.content() else {
            return false;
        };

        let matched = SIGNATURES.is_match(content) || has_lockfile_header(content);
        if matched {
            tracing::trace!("{} has a lock-file signature", candidate.relative_path());
        }
        matched
    }
}

/// First non-blank line is a comment mentioning a lockfile
fn has_lockfile_header(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(&content[..content.len().min(4096)]);
    let Some(first) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return false;
    };
    if !COMMENT_PREFIXES.iter().any(|prefix| first.starts_with(prefix)) {
        return false;
    }
    let lower = first.to_ascii_lowercase();
    lower.contains("lockfile") || lower.contains("lock file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npm_lock_signature() {
        let content = r#"{ "name": "x", "lockfileVersion": 3, "packages": {} }"#;
        assert!(LockSignatureDetector::new().matches(&Candidate::in_memory("web/package-lock.json", content)));
    }

    #[test]
    fn test_requires_lock_in_name() {
        let content = r#"{ "lockfileVersion": 3 }"#;
        assert!(!LockSignatureDetector::new().matches(&Candidate::in_memory("fixtures/sample.json", content)));
    }

    #[test]
    fn test_requires_signature_in_content() {
        let content = "pub struct Clock { ticks: u64 }\n";
        assert!(!LockSignatureDetector::new().matches(&Candidate::in_memory("src/clock.rs", content)));
    }

    #[test]
    fn test_header_comment() {
        let content = "\n# Custom lock file for the deploy tool\nalpha=1\n";
        assert!(LockSignatureDetector::new().matches(&Candidate::in_memory("deploy.lock", content)));
    }

    #[test]
    fn test_cargo_lock_header() {
        let content = "# This file is automatically @generated by Cargo.\n# It is not intended for manual editing.\nversion = 4\n";
        assert!(LockSignatureDetector::new().matches(&Candidate::in_memory("Cargo.lock", content)));
    }
}
