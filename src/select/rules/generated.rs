use crate::select::candidate::Candidate;
use crate::select::static_data::{GENERATED_MARKERS, is_binary_extension};
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static MARKERS: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(GENERATED_MARKERS)
        .expect("Failed to compile generated-code markers")
});

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#).expect("Failed to compile quoted regex")
});

static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-fA-F]{7,}\b").expect("Failed to compile hash regex"));

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bv?\d+(?:\.\d+)+(?:[-+][0-9A-Za-z.-]+)?\b")
        .expect("Failed to compile version regex")
});

/// Lines shorter than this after trimming carry no signal (braces, blank lines)
const MIN_SIGNIFICANT_LINE: usize = 3;

/// Generated-code detection by marker, then by repetitiveness
#[derive(Debug, Clone, Copy)]
pub struct GeneratedFileDetector {
    size_threshold: u64,
    min_lines: usize,
    duplicate_ratio: f64,
}

impl Default for GeneratedFileDetector {
    fn default() -> Self {
        Self::new(1024 * 1024, 40, 0.6)
    }
}

impl GeneratedFileDetector {
    pub fn new(size_threshold: u64, min_lines: usize, duplicate_ratio: f64) -> Self {
        Self {
            size_threshold,
            min_lines,
            duplicate_ratio,
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        // The binary rule owns these; skip the full read
        if candidate.extension().is_some_and(is_binary_extension) {
            return false;
        }
        let Some(content) = candidate.content() else {
            return false;
        };

        if has_generated_marker(content) {
            tracing::trace!("{} carries a generated-code marker", candidate.relative_path());
            return true;
        }

        if content.len() as u64 >= self.size_threshold {
            return false;
        }
        let text = String::from_utf8_lossy(content);
        let (lines, ratio) = duplicate_line_ratio(&text);
        let repetitive = lines >= self.min_lines && ratio >= self.duplicate_ratio;
        if repetitive {
            tracing::trace!(
                "{} looks generated: {:.0}% of {} lines repeat",
                candidate.relative_path(),
                ratio * 100.0,
                lines
            );
        }
        repetitive
    }
}

pub fn has_generated_marker(content: &[u8]) -> bool {
    MARKERS.is_match(content)
}

/// Replace quoted literals, hashes and version numbers with placeholders
pub fn normalize_line(line: &str) -> String {
    let line = QUOTED_RE.replace_all(line.trim(), "<str>");
    let line = HASH_RE.replace_all(&line, "<hash>");
    VERSION_RE.replace_all(&line, "<ver>").into_owned()
}

/// Count significant lines and the share that repeat after normalization
pub fn duplicate_line_ratio(text: &str) -> (usize, f64) {
    let mut seen = HashSet::new();
    let mut total = 0usize;
    let mut duplicates = 0usize;

    for line in text.lines() {
        if line.trim().len() < MIN_SIGNIFICANT_LINE {
            continue;
        }
        total += 1;
        if !seen.insert(normalize_line(line)) {
            duplicates += 1;
        }
    }

    if total == 0 {
        (0, 0.0)
    } else {
        (total, duplicates as f64 / total as f64)
    }
}
