//! End-to-end selection run
//!
//! Traversal, classification and token counting may run in parallel and are
//! cancellable between files. Their results are re-joined in traversal order,
//! ranked, and only then handed to the strictly sequential allocator.

use crate::parallel::ExecutionStrategy;
use crate::select::budget::{EntryPointMatcher, TokenBudgetAllocator};
use crate::select::cancel::CancellationToken;
use crate::select::candidate::Candidate;
use crate::select::config::{EngineConfig, FilterConfig};
use crate::select::data::{
    ExcludedFile, ExtractionResult, IncludedFile, StatsCollector, Warning,
};
use crate::select::ecosystem::EcosystemRegistry;
use crate::select::error::SelectError;
use crate::select::gitignore::GitIgnoreMatcher;
use crate::select::pipeline::{FilterPipeline, Verdict};
use crate::select::relevance::{ScoreBreakdown, compare_ranked};
use crate::select::tokens::{ApproximateTokenCounter, TokenCounter};
use crate::select::walker::{WalkSettings, collect_candidates};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// A file that passed every stage, waiting for its token cost
struct Survivor {
    candidate: Candidate,
    relevance: Option<(u64, ScoreBreakdown)>,
}

/// A survivor with its content decoded and counted
struct Counted {
    file: IncludedFile,
    warning: Option<Warning>,
}

pub struct Extractor {
    root: PathBuf,
    filter: FilterConfig,
    engine: EngineConfig,
    pipeline: FilterPipeline,
    counter: Arc<dyn TokenCounter>,
    entry_points: Option<EntryPointMatcher>,
}

impl Extractor {
    /// Validate the root and compile every stage
    pub fn new(
        root: impl AsRef<Path>,
        filter: FilterConfig,
        engine: EngineConfig,
    ) -> Result<Self, SelectError> {
        let root = root.as_ref().to_path_buf();
        validate_root(&root)?;

        let pipeline = FilterPipeline::new(
            &root,
            &filter,
            &engine.heuristics(),
            engine.manifest_scan_depth,
        )?;
        let entry_points = if engine.prioritize_entry_points {
            Some(EntryPointMatcher::new(&engine.entry_point_patterns)?)
        } else {
            None
        };

        Ok(Self {
            counter: Arc::new(ApproximateTokenCounter::new(engine.chars_per_token)),
            root,
            filter,
            engine,
            pipeline,
            entry_points,
        })
    }

    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_gitignore(mut self, matcher: Arc<dyn GitIgnoreMatcher>) -> Self {
        self.pipeline = self.pipeline.with_gitignore(matcher);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &EcosystemRegistry {
        self.pipeline.registry()
    }

    pub fn run(&self) -> Result<ExtractionResult, SelectError> {
        let mut cancel = CancellationToken::new();
        if let Some(timeout) = self.engine.timeout() {
            cancel = cancel.with_timeout(timeout);
        }
        self.run_with_cancel(&cancel)
    }

    pub fn run_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, SelectError> {
        let start = Instant::now();
        let stats = StatsCollector::new();

        let walked = collect_candidates(
            &self.root,
            self.pipeline.pruner(&self.root),
            WalkSettings {
                follow_symlinks: self.engine.follow_symlinks,
                max_content_bytes: self.engine.max_content_bytes(),
            },
            &stats,
            cancel,
        )?;
        let mut warnings = walked.warnings;
        let strategy = self.strategy(walked.candidates.len());

        let verdicts = strategy.map_ordered(walked.candidates, |candidate| {
            if cancel.should_stop() {
                None
            } else {
                Some(self.pipeline.classify(candidate))
            }
        })?;
        cancel.check()?;

        let mut rejected = Vec::new();
        let mut survivors = Vec::new();
        for verdict in verdicts.into_iter().flatten() {
            match verdict {
                Verdict::Rejected { rejection, warning } => {
                    stats.record_rejection(rejection.stage);
                    warnings.extend(warning);
                    rejected.push(rejection);
                }
                Verdict::Selected(candidate) => survivors.push(Survivor {
                    candidate,
                    relevance: None,
                }),
                Verdict::Scored(scored) => survivors.push(Survivor {
                    candidate: scored.candidate,
                    relevance: Some((scored.score, scored.breakdown)),
                }),
            }
        }

        let survivors = self.prioritize(survivors);
        let selected_count = survivors.len();

        let counted = strategy.map_ordered(survivors, |survivor| {
            if cancel.should_stop() {
                None
            } else {
                Some(self.count(survivor))
            }
        })?;
        cancel.check()?;

        let mut prepared = Vec::with_capacity(counted.len());
        for counted in counted.into_iter().flatten() {
            match counted {
                Ok(counted) => {
                    warnings.extend(counted.warning);
                    let tokens = counted.file.tokens;
                    prepared.push((counted.file, tokens));
                }
                Err(warning) => {
                    stats.increment_files_unreadable();
                    warnings.push(warning);
                }
            }
        }

        let allocation = TokenBudgetAllocator::new(self.filter.token_budget).allocate(prepared);

        let mut summary = stats.to_stats();
        summary.files_selected = selected_count;
        summary.files_included = allocation.included.len();
        summary.files_over_budget = allocation.excluded.len();
        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Included {} of {} files ({} / {} tokens, budget {})",
            summary.files_included,
            summary.files_discovered,
            allocation.token_count,
            allocation.total_tokens,
            if allocation.max_tokens == 0 {
                "unlimited".to_string()
            } else {
                allocation.max_tokens.to_string()
            }
        );

        Ok(ExtractionResult {
            root: self.root.clone(),
            included: allocation.included.into_iter().map(|(file, _)| file).collect(),
            excluded: allocation
                .excluded
                .into_iter()
                .map(|(file, tokens)| ExcludedFile {
                    relative_path: file.relative_path,
                    tokens,
                })
                .collect(),
            rejected,
            token_count: allocation.token_count,
            total_tokens: allocation.total_tokens,
            max_tokens: allocation.max_tokens,
            warnings,
            stats: summary,
        })
    }

    fn strategy(&self, work_items: usize) -> ExecutionStrategy {
        let workers = ExecutionStrategy::calculate_optimal_workers(
            self.engine.max_threads,
            self.engine.thread_percentage,
        );
        let workers = workers.min(work_items.max(1));
        ExecutionStrategy::auto(work_items, self.engine.min_files_for_parallel, workers)
    }

    /// Rank by relevance when active, then move entry points to the front
    fn prioritize(&self, mut survivors: Vec<Survivor>) -> Vec<Survivor> {
        if self.pipeline.is_relevance_active() {
            survivors.sort_by(|a, b| {
                let score = |s: &Survivor| s.relevance.map(|(score, _)| score).unwrap_or(0);
                compare_ranked(
                    score(a),
                    a.candidate.relative_path(),
                    score(b),
                    b.candidate.relative_path(),
                )
            });
        }

        match &self.entry_points {
            Some(matcher) => matcher.prioritize(survivors, |s| s.candidate.file_name()),
            None => survivors,
        }
    }

    fn count(&self, survivor: Survivor) -> Result<Counted, Warning> {
        let candidate = survivor.candidate;
        let Some(text) = candidate.text() else {
            return Err(candidate.warning().unwrap_or_else(|| Warning {
                path: candidate.relative_path().to_string(),
                category: crate::select::data::WarningCategory::ReadFailed,
                message: "content unavailable".to_string(),
            }));
        };
        let content = text.into_owned();
        let tokens = self.counter.count(&content);

        Ok(Counted {
            warning: candidate.warning(),
            file: IncludedFile {
                path: candidate.path().to_path_buf(),
                relative_path: candidate.relative_path().to_string(),
                content,
                tokens,
                score: survivor.relevance.map(|(score, _)| score),
                breakdown: survivor.relevance.map(|(_, breakdown)| breakdown),
            },
        })
    }
}

fn validate_root(root: &Path) -> Result<(), SelectError> {
    let reason = match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => "not a directory".to_string(),
        Err(e) => e.to_string(),
    };
    Err(SelectError::InvalidRoot {
        path: root.to_path_buf(),
        reason,
    })
}
