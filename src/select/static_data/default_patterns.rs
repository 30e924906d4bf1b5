//! Default exclude patterns and entry-point globs
//!
//! Patterns follow `PatternRule` semantics: a trailing `/` marks a directory
//! matched anywhere in the path, a `*` makes the pattern a basename glob,
//! anything else matches loosely by prefix, `/`-substring or equality.

/// Paths excluded by the default rule set before any content is inspected
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    // Version control
    ".git/",
    ".svn/",
    ".hg/",
    // Rust
    "target/",
    // Node.js/JavaScript
    "node_modules/",
    "dist/",
    "build/",
    ".next/",
    ".nuxt/",
    ".yarn/",
    ".pnpm-store/",
    "bower_components/",
    // Python
    "__pycache__/",
    ".pytest_cache/",
    ".mypy_cache/",
    ".tox/",
    "venv/",
    ".venv/",
    // Go/PHP/Ruby
    "vendor/",
    // Java
    ".gradle/",
    // Generic caches
    ".cache/",
    "coverage/",
    ".nyc_output/",
    // IDE
    ".idea/",
    ".vscode/",
    ".vs/",
    // OS and editor noise
    ".DS_Store",
    "Thumbs.db",
    "*.swp",
    "*.swo",
    "*~",
    // Minified and compiled artefacts
    "*.min.js",
    "*.min.css",
    "*.map",
    "*.pyc",
    "*.log",
];

/// Files conventionally treated as a program's starting point
pub const DEFAULT_ENTRY_POINT_PATTERNS: &[&str] = &[
    "main.*",
    "README*",
    "index.*",
    "__main__.py",
    "lib.rs",
];
