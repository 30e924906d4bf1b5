//! Staged filter pipeline
//!
//! Every candidate goes through the active stages in a fixed order and the
//! first rejecting stage wins:
//! 1. `.gitignore` matcher
//! 2. default exclude rules; the binary detector stays on when the rest are disabled
//! 3. user exclude patterns
//! 4. extension allow-list
//! 5. relevance gate, only when keywords are configured
//!
//! Stages 1 to 4 work on paths and cheap content probes. Stage 5 reads the
//! full content, so it only runs for files that survived the others.

use crate::select::candidate::Candidate;
use crate::select::config::FilterConfig;
use crate::select::data::{Rejection, Warning};
use crate::select::ecosystem::EcosystemRegistry;
use crate::select::error::SelectError;
use crate::select::gitignore::{GitIgnoreFile, GitIgnoreMatcher};
use crate::select::relevance::{RelevanceScorer, ScoredFile};
use crate::select::rules::{
    ExtensionRule, HeuristicSettings, PatternRule, Rule, RuleAction, RuleKind, binary_rule,
    default_rules,
};
use crate::select::static_data::DEFAULT_EXCLUDE_PATTERNS;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The stage that rejected a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "rule")]
pub enum FilterStage {
    GitIgnore,
    DefaultRule(RuleKind),
    CustomExclude,
    ExtensionAllowList,
    Relevance,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStage::GitIgnore => f.write_str("gitignore"),
            FilterStage::DefaultRule(kind) => write!(f, "default rule ({kind})"),
            FilterStage::CustomExclude => f.write_str("exclude pattern"),
            FilterStage::ExtensionAllowList => f.write_str("extension not allowed"),
            FilterStage::Relevance => f.write_str("no keyword hits"),
        }
    }
}

/// Outcome of the path and content stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Process,
    Skip(FilterStage),
}

/// Outcome of all active stages for one candidate
#[derive(Debug)]
pub enum Verdict {
    /// Passed every stage, no relevance gate configured
    Selected(Candidate),
    /// Passed every stage including the relevance gate
    Scored(ScoredFile),
    /// Rejected by `rejection.stage`; the candidate and its content are dropped
    Rejected {
        rejection: Rejection,
        warning: Option<Warning>,
    },
}

impl Verdict {
    fn rejected(candidate: Candidate, stage: FilterStage) -> Self {
        tracing::trace!("Rejected {} ({})", candidate.relative_path(), stage);
        Verdict::Rejected {
            warning: candidate.warning(),
            rejection: Rejection {
                relative_path: candidate.relative_path().to_string(),
                stage,
            },
        }
    }
}

#[derive(Debug)]
pub struct FilterPipeline {
    gitignore: Option<Arc<dyn GitIgnoreMatcher>>,
    default_rules: Vec<Rule>,
    default_directories: Option<Arc<PatternRule>>,
    custom_excludes: Option<Rule>,
    extension_allow_list: Option<Rule>,
    scorer: Option<RelevanceScorer>,
    registry: Arc<EcosystemRegistry>,
}

impl FilterPipeline {
    /// Build every active stage for `root`
    ///
    /// Fails only when a user-supplied pattern does not compile.
    pub fn new(
        root: &Path,
        config: &FilterConfig,
        heuristics: &HeuristicSettings,
        manifest_scan_depth: usize,
    ) -> Result<Self, SelectError> {
        let custom_excludes = if config.exclude_patterns.is_empty() {
            None
        } else {
            let rule = PatternRule::new(&config.exclude_patterns, RuleAction::Exclude)?;
            (!rule.is_empty()).then_some(Rule::Pattern(rule))
        };

        let extension_allow_list = config
            .include_extensions
            .as_ref()
            .map(|extensions| ExtensionRule::new(extensions, RuleAction::Include))
            .filter(|rule| !rule.is_empty())
            .map(Rule::Extension);

        let gitignore: Option<Arc<dyn GitIgnoreMatcher>> = if config.use_gitignore {
            Some(Arc::new(GitIgnoreFile::load(root)))
        } else {
            None
        };

        let (registry, default_rules, default_directories) = if config.use_default_rules {
            let registry = Arc::new(EcosystemRegistry::scan(
                root,
                manifest_scan_depth,
                config.use_gitignore,
            ));
            let rules = default_rules(heuristics, Arc::clone(&registry))?;
            let directories = PatternRule::new(DEFAULT_EXCLUDE_PATTERNS, RuleAction::Exclude)?;
            (registry, rules, Some(Arc::new(directories)))
        } else {
            let binary = vec![Rule::Binary(binary_rule(heuristics))];
            (Arc::new(EcosystemRegistry::default()), binary, None)
        };

        let scorer = RelevanceScorer::new(&config.relevance_keywords);

        tracing::debug!(
            "Filter pipeline: gitignore={}, default rules={}, excludes={}, allow-list={}, relevance={}",
            gitignore.is_some(),
            default_rules.len(),
            custom_excludes.is_some(),
            extension_allow_list.is_some(),
            scorer.is_some()
        );

        Ok(Self {
            gitignore,
            default_rules,
            default_directories,
            custom_excludes,
            extension_allow_list,
            scorer,
            registry,
        })
    }

    /// Replace the stage 1 matcher, keeping it disabled if gitignore is off
    pub fn with_gitignore(mut self, matcher: Arc<dyn GitIgnoreMatcher>) -> Self {
        if self.gitignore.is_some() {
            self.gitignore = Some(matcher);
        }
        self
    }

    pub fn registry(&self) -> &EcosystemRegistry {
        &self.registry
    }

    pub fn scorer(&self) -> Option<&RelevanceScorer> {
        self.scorer.as_ref()
    }

    pub fn is_relevance_active(&self) -> bool {
        self.scorer.is_some()
    }

    /// Stages 1 to 4
    pub fn evaluate(&self, candidate: &Candidate) -> FilterDecision {
        let path = candidate.relative_path();

        if let Some(gitignore) = &self.gitignore
            && gitignore.is_ignored(path, false)
        {
            return FilterDecision::Skip(FilterStage::GitIgnore);
        }

        if let Some(rule) = self
            .default_rules
            .iter()
            .find(|rule| rule.action() == RuleAction::Exclude && rule.matches(candidate))
        {
            return FilterDecision::Skip(FilterStage::DefaultRule(rule.kind()));
        }

        if let Some(rule) = &self.custom_excludes
            && rule.matches(candidate)
        {
            return FilterDecision::Skip(FilterStage::CustomExclude);
        }

        if let Some(rule) = &self.extension_allow_list
            && !rule.matches(candidate)
        {
            return FilterDecision::Skip(FilterStage::ExtensionAllowList);
        }

        FilterDecision::Process
    }

    /// All active stages, consuming the candidate
    pub fn classify(&self, candidate: Candidate) -> Verdict {
        if let FilterDecision::Skip(stage) = self.evaluate(&candidate) {
            return Verdict::rejected(candidate, stage);
        }

        let Some(scorer) = &self.scorer else {
            return Verdict::Selected(candidate);
        };

        let breakdown = scorer.score(&candidate);
        let score = breakdown.score();
        if score == 0 {
            return Verdict::rejected(candidate, FilterStage::Relevance);
        }

        Verdict::Scored(ScoredFile {
            candidate,
            score,
            breakdown,
        })
    }

    /// Directory filter for traversal, detached from the pipeline's lifetime
    pub fn pruner(&self, root: &Path) -> DirectoryPruner {
        DirectoryPruner {
            root: root.to_path_buf(),
            gitignore: self.gitignore.clone(),
            directories: self.default_directories.clone(),
        }
    }
}

/// Decides which directories traversal can skip entirely
///
/// Only directories whose every descendant would be rejected anyway are
/// pruned, plus `.git`.
#[derive(Debug, Clone)]
pub struct DirectoryPruner {
    root: PathBuf,
    gitignore: Option<Arc<dyn GitIgnoreMatcher>>,
    directories: Option<Arc<PatternRule>>,
}

impl DirectoryPruner {
    pub fn should_prune(&self, dir: &Path) -> bool {
        if dir.file_name().is_some_and(|name| name == ".git") {
            return true;
        }

        let Ok(relative) = dir.strip_prefix(&self.root) else {
            return false;
        };
        let relative = crate::select::candidate::to_forward_slashes(relative);
        if relative.is_empty() {
            return false;
        }

        if let Some(gitignore) = &self.gitignore
            && gitignore.is_ignored(&relative, true)
        {
            tracing::trace!("Pruning ignored directory {}", relative);
            return true;
        }

        self.directories
            .as_ref()
            .is_some_and(|rule| rule.matches_directory(&relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn pipeline(config: FilterConfig) -> (TempDir, FilterPipeline) {
        let temp = TempDir::new().unwrap();
        let pipeline =
            FilterPipeline::new(temp.path(), &config, &HeuristicSettings::default(), 4).unwrap();
        (temp, pipeline)
    }

    #[test]
    fn test_defaults_accept_source() {
        let (_temp, pipeline) = pipeline(FilterConfig::default());
        let verdict = pipeline.classify(Candidate::in_memory("src/lib.rs", "pub fn f() {}\n"));
        assert!(matches!(verdict, Verdict::Selected(_)));
    }

    #[test]
    fn test_default_rule_stage_reports_rule_kind() {
        let (_temp, pipeline) = pipeline(FilterConfig::default());
        let decision = pipeline.evaluate(&Candidate::in_memory("node_modules/a/index.js", "x"));
        assert_eq!(decision, FilterDecision::Skip(FilterStage::DefaultRule(RuleKind::Pattern)));

        let decision = pipeline.evaluate(&Candidate::in_memory("img/logo.png", "x"));
        assert_eq!(decision, FilterDecision::Skip(FilterStage::DefaultRule(RuleKind::Binary)));
    }

    #[test]
    fn test_default_rules_can_be_disabled() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            use_default_rules: false,
            ..Default::default()
        });
        let decision = pipeline.evaluate(&Candidate::in_memory("node_modules/a/index.js", "x"));
        assert_eq!(decision, FilterDecision::Process);
    }

    #[test]
    fn test_binary_detection_survives_disabled_default_rules() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            use_default_rules: false,
            ..Default::default()
        });
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("logo.png", b"\x89PNG\r\n\x1a\n\0\0".to_vec())),
            FilterDecision::Skip(FilterStage::DefaultRule(RuleKind::Binary))
        );
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("blob", b"ab\0cd".to_vec())),
            FilterDecision::Skip(FilterStage::DefaultRule(RuleKind::Binary))
        );
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("dist/app.min.js", "x")),
            FilterDecision::Process
        );
    }

    #[test]
    fn test_custom_exclude_stage() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            exclude_patterns: vec!["fixtures/".to_string()],
            ..Default::default()
        });
        let decision = pipeline.evaluate(&Candidate::in_memory("tests/fixtures/a.rs", "x"));
        assert_eq!(decision, FilterDecision::Skip(FilterStage::CustomExclude));
    }

    #[test]
    fn test_invalid_custom_pattern_fails_construction() {
        let temp = TempDir::new().unwrap();
        let config = FilterConfig {
            exclude_patterns: vec!["*[".to_string()],
            ..Default::default()
        };
        let err = FilterPipeline::new(temp.path(), &config, &HeuristicSettings::default(), 4)
            .unwrap_err();
        assert!(matches!(err, SelectError::InvalidPattern { .. }));
    }

    #[test]
    fn test_extension_allow_list_stage() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            include_extensions: Some(BTreeSet::from(["rs".to_string()])),
            ..Default::default()
        });
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("main.py", "print()")),
            FilterDecision::Skip(FilterStage::ExtensionAllowList)
        );
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("Makefile", "all:")),
            FilterDecision::Skip(FilterStage::ExtensionAllowList)
        );
        assert_eq!(pipeline.evaluate(&Candidate::in_memory("main.rs", "fn main() {}")), FilterDecision::Process);
    }

    #[test]
    fn test_exclusion_beats_allow_list() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            include_extensions: Some(BTreeSet::from([".js".to_string()])),
            exclude_patterns: vec!["legacy/".to_string()],
            ..Default::default()
        });
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("legacy/app.js", "x")),
            FilterDecision::Skip(FilterStage::CustomExclude)
        );
    }

    #[test]
    fn test_gitignore_stage() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "secret.txt\n").unwrap();
        let pipeline = FilterPipeline::new(
            temp.path(),
            &FilterConfig::default(),
            &HeuristicSettings::default(),
            4,
        )
        .unwrap();
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("secret.txt", "x")),
            FilterDecision::Skip(FilterStage::GitIgnore)
        );
    }

    #[test]
    fn test_injected_gitignore_matcher() {
        #[derive(Debug)]
        struct IgnoreDocs;
        impl GitIgnoreMatcher for IgnoreDocs {
            fn is_ignored(&self, relative_path: &str, _is_dir: bool) -> bool {
                relative_path.starts_with("docs/")
            }
        }

        let (_temp, pipeline) = pipeline(FilterConfig::default());
        let pipeline = pipeline.with_gitignore(Arc::new(IgnoreDocs));
        assert_eq!(
            pipeline.evaluate(&Candidate::in_memory("docs/guide.md", "x")),
            FilterDecision::Skip(FilterStage::GitIgnore)
        );
    }

    #[test]
    fn test_relevance_gate() {
        let (_temp, pipeline) = pipeline(FilterConfig {
            relevance_keywords: vec!["auth".to_string()],
            ..Default::default()
        });

        match pipeline.classify(Candidate::in_memory("src/auth.rs", "fn check() {}")) {
            Verdict::Scored(scored) => assert_eq!(scored.score, 10),
            other => panic!("unexpected verdict: {other:?}"),
        }
        match pipeline.classify(Candidate::in_memory("src/db.rs", "fn query() {}")) {
            Verdict::Rejected { rejection, .. } => {
                assert_eq!(rejection.stage, FilterStage::Relevance);
                assert_eq!(rejection.relative_path, "src/db.rs");
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_content_is_released() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("gen.go");
        fs::write(&file, "// Code generated by protoc. DO NOT EDIT.\npackage gen\n").unwrap();
        let pipeline = FilterPipeline::new(
            temp.path(),
            &FilterConfig::default(),
            &HeuristicSettings::default(),
            4,
        )
        .unwrap();

        let candidate = Candidate::from_path(temp.path(), file, u64::MAX);
        assert!(candidate.content().is_some());
        let content = Arc::downgrade(&candidate.content_handle().unwrap());

        match pipeline.classify(candidate) {
            Verdict::Rejected { rejection, warning } => {
                assert_eq!(rejection.relative_path, "gen.go");
                assert_eq!(rejection.stage, FilterStage::DefaultRule(RuleKind::Generated));
                assert!(warning.is_none());
            }
            other => panic!("unexpected verdict: {other:?}"),
        }
        assert!(content.upgrade().is_none());
    }

    #[test]
    fn test_pruner() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "out/\n").unwrap();
        let pipeline = FilterPipeline::new(
            temp.path(),
            &FilterConfig::default(),
            &HeuristicSettings::default(),
            4,
        )
        .unwrap();
        let pruner = pipeline.pruner(temp.path());

        assert!(pruner.should_prune(&temp.path().join(".git")));
        assert!(pruner.should_prune(&temp.path().join("out")));
        assert!(pruner.should_prune(&temp.path().join("web/node_modules")));
        assert!(!pruner.should_prune(&temp.path().join("src")));
        assert!(!pruner.should_prune(temp.path()));
    }
}
