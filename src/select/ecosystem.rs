//! Package-manager ecosystem detection
//!
//! The registry is computed once per pipeline by a shallow walk of the root
//! looking for manifest basenames. It is read-only afterwards and shared by
//! reference with the ecosystem-aware lock detector.

use crate::select::static_data::ECOSYSTEM_TABLE;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Directories never descended into while looking for manifests
const SCAN_SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "vendor",
    "dist",
    "build",
    ".venv",
    "venv",
    "__pycache__",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Node,
    Python,
    Ruby,
    Rust,
    Go,
    Dotnet,
    Java,
    Php,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Node => "node",
            Ecosystem::Python => "python",
            Ecosystem::Ruby => "ruby",
            Ecosystem::Rust => "rust",
            Ecosystem::Go => "go",
            Ecosystem::Dotnet => "dotnet",
            Ecosystem::Java => "java",
            Ecosystem::Php => "php",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CompiledEcosystem {
    ecosystem: Ecosystem,
    manifests: GlobSet,
    lock_files: GlobSet,
}

static COMPILED: LazyLock<Vec<CompiledEcosystem>> = LazyLock::new(|| {
    ECOSYSTEM_TABLE
        .iter()
        .map(|entry| CompiledEcosystem {
            ecosystem: entry.ecosystem,
            manifests: compile(entry.manifests),
            lock_files: compile(entry.lock_files),
        })
        .collect()
});

fn compile(globs: &[&str]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(Glob::new(glob).expect("static ecosystem glob"));
    }
    builder.build().expect("static ecosystem glob set")
}

/// Ecosystems detected under a root, with their lock-file globs
#[derive(Debug, Clone, Default)]
pub struct EcosystemRegistry {
    detected: BTreeSet<Ecosystem>,
}

impl EcosystemRegistry {
    /// Walk `root` up to `max_depth` levels and record every manifest found
    ///
    /// With `respect_gitignore`, manifests in directories ignored by
    /// `.gitignore` or `.git/info/exclude` do not count. Walk errors are
    /// skipped: a directory that cannot be listed contributes no manifests.
    pub fn scan(root: &Path, max_depth: usize, respect_gitignore: bool) -> Self {
        let walker = WalkBuilder::new(root)
            .max_depth(Some(max_depth.max(1)))
            .hidden(false)
            .ignore(false)
            .git_global(false)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .require_git(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && SCAN_SKIP_DIRS.contains(&entry.file_name().to_string_lossy().as_ref()))
            })
            .build();

        let mut detected = BTreeSet::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping entry during ecosystem scan: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            detected.extend(manifest_ecosystems(&name));
        }

        if detected.is_empty() {
            tracing::debug!("No package-manager ecosystems detected under {}", root.display());
        } else {
            let names: Vec<&str> = detected.iter().map(Ecosystem::as_str).collect();
            tracing::debug!("Detected ecosystems: {}", names.join(", "));
        }

        Self { detected }
    }

    /// Registry with a fixed set of ecosystems, bypassing the scan
    pub fn from_ecosystems(ecosystems: impl IntoIterator<Item = Ecosystem>) -> Self {
        Self {
            detected: ecosystems.into_iter().collect(),
        }
    }

    pub fn detected(&self) -> &BTreeSet<Ecosystem> {
        &self.detected
    }

    pub fn is_detected(&self, ecosystem: Ecosystem) -> bool {
        self.detected.contains(&ecosystem)
    }

    /// Lock-file globs of each detected ecosystem
    pub fn lock_files_by_ecosystem(&self) -> BTreeMap<Ecosystem, &'static [&'static str]> {
        ECOSYSTEM_TABLE
            .iter()
            .filter(|entry| self.is_detected(entry.ecosystem))
            .map(|entry| (entry.ecosystem, entry.lock_files))
            .collect()
    }

    /// The detected ecosystem owning `file_name` as a lock file, if any
    pub fn lock_owner(&self, file_name: &str) -> Option<Ecosystem> {
        COMPILED
            .iter()
            .filter(|compiled| self.is_detected(compiled.ecosystem))
            .find(|compiled| compiled.lock_files.is_match(file_name))
            .map(|compiled| compiled.ecosystem)
    }

    pub fn is_lock_file(&self, file_name: &str) -> bool {
        self.lock_owner(file_name).is_some()
    }
}

/// Ecosystems whose manifest globs match a basename
pub fn manifest_ecosystems(file_name: &str) -> impl Iterator<Item = Ecosystem> + '_ {
    COMPILED
        .iter()
        .filter(move |compiled| compiled.manifests.is_match(file_name))
        .map(|compiled| compiled.ecosystem)
}
