//! Keyword relevance scoring
//!
//! `score = 10 * filename + 5 * directory + 3 * import + 1 * content`, each
//! term counting case-insensitive, non-overlapping keyword occurrences in
//! that field. A file with score 0 is not relevant.

use crate::select::candidate::Candidate;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const FILENAME_WEIGHT: u64 = 10;
pub const DIRECTORY_WEIGHT: u64 = 5;
pub const IMPORT_WEIGHT: u64 = 3;
pub const CONTENT_WEIGHT: u64 = 1;

/// Import-like references, first capture group is the referenced name
static IMPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Python `import x` / `from x import y`, Java `import a.b.C;`
        r"(?m)^\s*(?:import|from)\s+([\w./@:-]+)",
        // JS/TS and Go single imports with a quoted module
        r#"(?m)^\s*import\s+(?:[\w*{}\s,$]+\s+from\s+)?["'`]([^"'`]+)["'`]"#,
        // Tail of multi-line JS/TS imports and re-exports
        r#"\bfrom\s+["']([^"']+)["']"#,
        // CommonJS, Ruby require and require_relative
        r#"\brequire(?:_relative)?\s*\(?\s*["']([^"']+)["']"#,
        // Rust `use` and `pub use`
        r"(?m)^\s*(?:pub(?:\([\w\s]+\))?\s+)?use\s+([\w:{}, *]+);",
        // C and C++ includes
        r#"(?m)^\s*#\s*include\s*[<"]([^>"]+)[>"]"#,
        // CSS, SCSS and Less imports
        r#"@import\s+(?:url\()?["']?([^"')\s;]+)"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Failed to compile import regex"))
    .collect()
});

static GO_IMPORT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^\s*import\s*\((.*?)\)").expect("Failed to compile Go import block regex")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("Failed to compile quoted regex"));

/// Per-field hit counts behind a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub filename_hits: u64,
    pub directory_hits: u64,
    pub import_hits: u64,
    pub content_hits: u64,
}

impl ScoreBreakdown {
    pub fn score(&self) -> u64 {
        FILENAME_WEIGHT * self.filename_hits
            + DIRECTORY_WEIGHT * self.directory_hits
            + IMPORT_WEIGHT * self.import_hits
            + CONTENT_WEIGHT * self.content_hits
    }
}

/// A candidate that passed the relevance gate
#[derive(Debug)]
pub struct ScoredFile {
    pub candidate: Candidate,
    pub score: u64,
    pub breakdown: ScoreBreakdown,
}

/// Scores candidates against a fixed keyword list
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
}

impl RelevanceScorer {
    /// Scorer for the given keywords, `None` when none survive parsing
    pub fn new<I, S>(keywords: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = keywords.into_iter().map(|k| k.as_ref().to_string()).collect();
        let keywords = parse_keywords(&joined.join(","));
        if keywords.is_empty() {
            None
        } else {
            Some(Self { keywords })
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Score a candidate, reading its content
    ///
    /// Unreadable content contributes no import or content hits.
    pub fn score(&self, candidate: &Candidate) -> ScoreBreakdown {
        let text = candidate.text();
        let content = text.as_deref().unwrap_or("");
        let imports = extract_imports(content);
        self.score_fields(candidate.file_name(), candidate.directory(), &imports, content)
    }

    pub fn score_fields(
        &self,
        file_name: &str,
        directory: &str,
        imports: &[String],
        content: &str,
    ) -> ScoreBreakdown {
        let file_name = file_name.to_lowercase();
        let directory = directory.to_lowercase();
        let imports: Vec<String> = imports.iter().map(|i| i.to_lowercase()).collect();
        let content = content.to_lowercase();

        let mut breakdown = ScoreBreakdown::default();
        for keyword in &self.keywords {
            breakdown.filename_hits += count_occurrences(&file_name, keyword);
            breakdown.directory_hits += count_occurrences(&directory, keyword);
            breakdown.import_hits += imports
                .iter()
                .map(|import| count_occurrences(import, keyword))
                .sum::<u64>();
            breakdown.content_hits += count_occurrences(&content, keyword);
        }
        breakdown
    }
}

/// Split a comma or whitespace separated keyword string
///
/// Keywords are lowercased and deduplicated, keeping first-seen order.
pub fn parse_keywords(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Non-overlapping occurrences of an already-lowercased needle
pub fn count_occurrences(haystack: &str, needle: &str) -> u64 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as u64
}

/// Referenced module names in source order
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for pattern in IMPORT_PATTERNS.iter() {
        for captures in pattern.captures_iter(content) {
            if let Some(name) = captures.get(1) {
                found.push((name.start(), name.as_str().trim().to_string()));
            }
        }
    }
    for block in GO_IMPORT_BLOCK.captures_iter(content) {
        if let Some(body) = block.get(1) {
            for quoted in QUOTED.captures_iter(body.as_str()) {
                if let Some(name) = quoted.get(1) {
                    found.push((body.start() + name.start(), name.as_str().to_string()));
                }
            }
        }
    }

    found.sort();
    found.dedup();
    found.into_iter().map(|(_, name)| name).collect()
}

/// Descending score, ties broken by ascending path
pub fn compare_ranked(a_score: u64, a_path: &str, b_score: u64, b_path: &str) -> Ordering {
    b_score.cmp(&a_score).then_with(|| a_path.cmp(b_path))
}

/// Sort scored files into selection priority order
pub fn rank(files: &mut [ScoredFile]) {
    files.sort_by(|a, b| {
        compare_ranked(
            a.score,
            a.candidate.relative_path(),
            b.score,
            b.candidate.relative_path(),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("Auth, login  token,auth"), vec!["auth", "login", "token"]);
        assert!(parse_keywords(" , ").is_empty());
    }

    #[test]
    fn test_scorer_requires_keywords() {
        assert!(RelevanceScorer::new(Vec::<String>::new()).is_none());
        assert!(RelevanceScorer::new([" "]).is_none());
        let scorer = RelevanceScorer::new(["Auth login", "auth"]).unwrap();
        assert_eq!(scorer.keywords(), ["auth", "login"]);
    }

    #[test]
    fn test_weighted_score() {
        let scorer = RelevanceScorer::new(["auth"]).unwrap();
        let candidate = Candidate::in_memory(
            "src/auth/auth_service.py",
            "from auth.tokens import issue\n\ndef check():\n    return issue()\n",
        );
        let breakdown = scorer.score(&candidate);
        assert_eq!(breakdown.filename_hits, 1);
        assert_eq!(breakdown.directory_hits, 1);
        assert_eq!(breakdown.import_hits, 1);
        assert_eq!(breakdown.content_hits, 1);
        assert_eq!(breakdown.score(), 10 + 5 + 3 + 1);
    }

    #[test]
    fn test_score_is_case_insensitive() {
        let scorer = RelevanceScorer::new(["login"]).unwrap();
        let breakdown = scorer.score(&Candidate::in_memory("LoginForm.tsx", "LOGIN login Login"));
        assert_eq!(breakdown.filename_hits, 1);
        assert_eq!(breakdown.content_hits, 3);
    }

    #[test]
    fn test_count_occurrences_is_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }

    #[test]
    fn test_extract_imports_across_languages() {
        let source = r#"
import os
from django.db import models
import React from 'react';
import { useState } from "react";
const fs = require("fs");
require_relative 'helpers/auth'
use crate::select::rules;
#include <stdio.h>
@import url("theme.css");
"#;
        let imports = extract_imports(source);
        for expected in ["os", "django.db", "react", "fs", "helpers/auth", "crate::select::rules", "stdio.h", "theme.css"] {
            assert!(imports.iter().any(|i| i == expected), "missing {expected} in {imports:?}");
        }
    }

    #[test]
    fn test_extract_go_import_block() {
        let source = "package main\n\nimport (\n\t\"fmt\"\n\t\"net/http\"\n)\n";
        let imports = extract_imports(source);
        assert_eq!(imports, vec!["fmt", "net/http"]);
    }

    #[test]
    fn test_rank_breaks_ties_by_path() {
        let mut files = vec![
            ScoredFile { candidate: Candidate::in_memory("b.rs", ""), score: 5, breakdown: ScoreBreakdown::default() },
            ScoredFile { candidate: Candidate::in_memory("a.rs", ""), score: 5, breakdown: ScoreBreakdown::default() },
            ScoredFile { candidate: Candidate::in_memory("z.rs", ""), score: 9, breakdown: ScoreBreakdown::default() },
        ];
        rank(&mut files);
        let order: Vec<&str> = files.iter().map(|f| f.candidate.relative_path()).collect();
        assert_eq!(order, vec!["z.rs", "a.rs", "b.rs"]);
    }
}
