//! Manifest and lock-file tables per package-manager ecosystem
//!
//! Entries are basename globs. Literal names are valid globs, so both
//! `Cargo.toml` and `*.csproj` go through the same matcher.

use crate::select::ecosystem::Ecosystem;

/// Manifest and lock-file globs for one ecosystem
#[derive(Debug, Clone, Copy)]
pub struct EcosystemEntry {
    pub ecosystem: Ecosystem,
    /// Basenames whose presence marks the ecosystem as detected
    pub manifests: &'static [&'static str],
    /// Basenames of lock files produced by the ecosystem's package managers
    pub lock_files: &'static [&'static str],
}

pub const ECOSYSTEM_TABLE: &[EcosystemEntry] = &[
    EcosystemEntry {
        ecosystem: Ecosystem::Node,
        manifests: &["package.json"],
        lock_files: &[
            "package-lock.json",
            "npm-shrinkwrap.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "bun.lockb",
            "bun.lock",
            ".pnp.cjs",
            ".pnp.loader.mjs",
        ],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Python,
        manifests: &["pyproject.toml", "Pipfile", "requirements.txt", "setup.py", "setup.cfg"],
        lock_files: &["poetry.lock", "Pipfile.lock", "pdm.lock", "uv.lock", "pylock.toml", "pylock.*.toml"],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Ruby,
        manifests: &["Gemfile", "*.gemspec"],
        lock_files: &["Gemfile.lock", "gems.locked"],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Rust,
        manifests: &["Cargo.toml"],
        lock_files: &["Cargo.lock"],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Go,
        manifests: &["go.mod", "go.work"],
        lock_files: &["go.sum", "go.work.sum"],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Dotnet,
        manifests: &["*.csproj", "*.fsproj", "*.vbproj"],
        lock_files: &[
            "packages.lock.json",
            "project.assets.json",
            "*.nuget.props",
            "*.nuget.targets",
            "*.nuget.g.props",
            "*.nuget.g.targets",
        ],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Java,
        manifests: &["build.gradle", "build.gradle.kts", "pom.xml"],
        lock_files: &["gradle.lockfile", "buildscript-gradle.lockfile"],
    },
    EcosystemEntry {
        ecosystem: Ecosystem::Php,
        manifests: &["composer.json"],
        lock_files: &["composer.lock"],
    },
];
