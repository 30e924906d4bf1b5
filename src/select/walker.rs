//! Deterministic traversal producing candidates
//!
//! The walker does not apply gitignore itself; stage 1 of the pipeline does.
//! It only prunes directories the pipeline would reject wholesale.

use crate::select::cancel::CancellationToken;
use crate::select::candidate::Candidate;
use crate::select::data::{StatsCollector, Warning, WarningCategory};
use crate::select::error::SelectError;
use crate::select::pipeline::DirectoryPruner;
use ignore::WalkBuilder;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct WalkSettings {
    pub follow_symlinks: bool,
    pub max_content_bytes: u64,
}

#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub candidates: Vec<Candidate>,
    pub warnings: Vec<Warning>,
}

/// Collect every regular file under `root` in sorted traversal order
pub fn collect_candidates(
    root: &Path,
    pruner: DirectoryPruner,
    settings: WalkSettings,
    stats: &StatsCollector,
    cancel: &CancellationToken,
) -> Result<WalkOutcome, SelectError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(settings.follow_symlinks)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && pruner.should_prune(entry.path()))
        })
        .build();

    let mut outcome = WalkOutcome::default();
    for entry in walker {
        cancel.check()?;

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Walk error: {}", e);
                outcome.warnings.push(Warning {
                    path: error_path(&e, root),
                    category: WarningCategory::WalkError,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if entry.depth() > 0 {
                stats.increment_directories_traversed();
            }
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        stats.increment_files_discovered();
        outcome.candidates.push(Candidate::from_path(
            root,
            entry.into_path(),
            settings.max_content_bytes,
        ));
    }

    tracing::debug!(
        "Discovered {} files under {}",
        outcome.candidates.len(),
        root.display()
    );
    Ok(outcome)
}

fn error_path(error: &ignore::Error, root: &Path) -> String {
    fn find(error: &ignore::Error) -> Option<&Path> {
        match error {
            ignore::Error::WithPath { path, .. } => Some(path),
            ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
                find(err)
            }
            _ => None,
        }
    }
    find(error)
        .map(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            crate::select::candidate::to_forward_slashes(relative)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::config::FilterConfig;
    use crate::select::pipeline::FilterPipeline;
    use crate::select::rules::HeuristicSettings;
    use std::fs;
    use tempfile::TempDir;

    fn walk(root: &Path, config: FilterConfig) -> (WalkOutcome, StatsCollector) {
        let pipeline =
            FilterPipeline::new(root, &config, &HeuristicSettings::default(), 4).unwrap();
        let stats = StatsCollector::new();
        let outcome = collect_candidates(
            root,
            pipeline.pruner(root),
            WalkSettings {
                follow_symlinks: false,
                max_content_bytes: u64::MAX,
            },
            &stats,
            &CancellationToken::new(),
        )
        .unwrap();
        (outcome, stats)
    }

    fn paths(outcome: &WalkOutcome) -> Vec<&str> {
        outcome.candidates.iter().map(Candidate::relative_path).collect()
    }

    #[test]
    fn test_sorted_traversal() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/b")).unwrap();
        fs::write(temp.path().join("z.txt"), "z").unwrap();
        fs::write(temp.path().join("src/b/c.rs"), "c").unwrap();
        fs::write(temp.path().join("src/a.rs"), "a").unwrap();

        let (outcome, stats) = walk(temp.path(), FilterConfig::default());
        assert_eq!(paths(&outcome), vec!["src/a.rs", "src/b/c.rs", "z.txt"]);
        let stats = stats.to_stats();
        assert_eq!(stats.files_discovered, 3);
        assert_eq!(stats.directories_traversed, 2);
    }

    #[test]
    fn test_git_and_default_directories_pruned() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();
        fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
        fs::write(temp.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(temp.path().join("index.js"), "x").unwrap();

        let (outcome, _) = walk(temp.path(), FilterConfig::default());
        assert_eq!(paths(&outcome), vec!["index.js"]);
    }

    #[test]
    fn test_hidden_files_are_candidates() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env.example"), "KEY=").unwrap();

        let (outcome, _) = walk(temp.path(), FilterConfig::default());
        assert_eq!(paths(&outcome), vec![".env.example"]);
    }

    #[test]
    fn test_no_pruning_without_default_rules() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        fs::write(temp.path().join("node_modules/a.js"), "x").unwrap();

        let config = FilterConfig {
            use_default_rules: false,
            ..Default::default()
        };
        let (outcome, _) = walk(temp.path(), config);
        assert_eq!(paths(&outcome), vec!["node_modules/a.js"]);
    }

    #[test]
    fn test_cancelled_walk_stops() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let pipeline = FilterPipeline::new(
            temp.path(),
            &FilterConfig::default(),
            &HeuristicSettings::default(),
            4,
        )
        .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = collect_candidates(
            temp.path(),
            pipeline.pruner(temp.path()),
            WalkSettings {
                follow_symlinks: false,
                max_content_bytes: u64::MAX,
            },
            &StatsCollector::new(),
            &cancel,
        );
        assert!(matches!(result, Err(SelectError::Cancelled)));
    }
}
