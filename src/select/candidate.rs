//! Candidate files produced by traversal
//!
//! A `Candidate` carries the metadata rules need up front and loads its
//! content lazily, at most once, when the first content-dependent rule asks
//! for it. I/O failures are recorded on the candidate and surface as
//! non-fatal warnings; every rule treats them as "not matched".

use crate::select::data::{Warning, WarningCategory};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// A file under consideration for inclusion
#[derive(Debug)]
pub struct Candidate {
    path: PathBuf,
    relative_path: String,
    size_bytes: u64,
    extension: Option<String>,
    max_content_bytes: u64,
    content: OnceLock<Option<Arc<[u8]>>>,
    issue: OnceLock<(WarningCategory, String)>,
}

impl Candidate {
    /// Build a candidate for a file on disk, reading its metadata
    pub fn from_path(root: &Path, path: PathBuf, max_content_bytes: u64) -> Self {
        let issue = OnceLock::new();
        let size_bytes = match std::fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                let _ = issue.set((WarningCategory::MetadataFailed, e.to_string()));
                0
            }
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let relative_path = to_forward_slashes(relative);

        Self {
            extension: extension_of(&relative_path),
            relative_path,
            path,
            size_bytes,
            max_content_bytes,
            content: OnceLock::new(),
            issue,
        }
    }

    /// Build a candidate whose content is already in memory
    pub fn in_memory(relative_path: &str, content: impl Into<Vec<u8>>) -> Self {
        let content: Vec<u8> = content.into();
        let relative_path = relative_path.replace('\\', "/");
        let loaded = OnceLock::new();
        let size_bytes = content.len() as u64;
        let _ = loaded.set(Some(Arc::from(content)));

        Self {
            path: PathBuf::from(&relative_path),
            extension: extension_of(&relative_path),
            relative_path,
            size_bytes,
            max_content_bytes: u64::MAX,
            content: loaded,
            issue: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root-relative path using forward slashes
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Extension including the leading dot, as written on disk
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn file_name(&self) -> &str {
        basename(&self.relative_path)
    }

    /// Directory part of the relative path, empty for files at the root
    pub fn directory(&self) -> &str {
        self.relative_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }

    /// Full file content, loaded on first access
    ///
    /// Returns `None` when the file cannot be read or exceeds the content cap.
    pub fn content(&self) -> Option<&[u8]> {
        self.content
            .get_or_init(|| self.load_content())
            .as_deref()
    }

    /// Content decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.content().map(String::from_utf8_lossy)
    }

    /// Whether the full content has already been loaded
    pub fn is_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// First `limit` bytes of the file without loading the rest
    pub fn prefix(&self, limit: usize) -> Option<Cow<'_, [u8]>> {
        if let Some(loaded) = self.content.get() {
            return loaded
                .as_deref()
                .map(|bytes| Cow::Borrowed(&bytes[..bytes.len().min(limit)]));
        }

        let mut buffer = Vec::with_capacity(limit);
        let read = File::open(&self.path)
            .and_then(|file| file.take(limit as u64).read_to_end(&mut buffer));
        match read {
            Ok(_) => Some(Cow::Owned(buffer)),
            Err(e) => {
                self.record_issue(WarningCategory::ReadFailed, e.to_string());
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn content_handle(&self) -> Option<Arc<[u8]>> {
        self.content.get().cloned().flatten()
    }

    /// Warning for the first I/O problem seen on this candidate, if any
    pub fn warning(&self) -> Option<Warning> {
        self.issue.get().map(|(category, message)| Warning {
            path: self.relative_path.clone(),
            category: *category,
            message: message.clone(),
        })
    }

    fn load_content(&self) -> Option<Arc<[u8]>> {
        if self.size_bytes > self.max_content_bytes {
            self.record_issue(
                WarningCategory::TooLarge,
                format!(
                    "{} bytes exceeds the {} byte content limit",
                    self.size_bytes, self.max_content_bytes
                ),
            );
            return None;
        }

        match std::fs::read(&self.path) {
            Ok(bytes) => Some(Arc::from(bytes)),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.relative_path, e);
                self.record_issue(WarningCategory::ReadFailed, e.to_string());
                None
            }
        }
    }

    fn record_issue(&self, category: WarningCategory, message: String) {
        let _ = self.issue.set((category, message));
    }
}

/// Render a path with forward slashes regardless of platform
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Last segment of a forward-slash path
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension_of(relative_path: &str) -> Option<String> {
    Path::new(basename(relative_path))
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_candidate() {
        let candidate = Candidate::in_memory("src\\auth\\login.rs", "fn login() {}");
        assert_eq!(candidate.relative_path(), "src/auth/login.rs");
        assert_eq!(candidate.file_name(), "login.rs");
        assert_eq!(candidate.directory(), "src/auth");
        assert_eq!(candidate.extension(), Some(".rs"));
        assert_eq!(candidate.size_bytes(), 13);
        assert!(candidate.is_loaded());
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(Candidate::in_memory("Makefile", "").extension(), None);
        assert_eq!(Candidate::in_memory(".gitignore", "").extension(), None);
        assert_eq!(
            Candidate::in_memory("a/archive.tar.gz", "").extension(),
            Some(".gz")
        );
        assert_eq!(Candidate::in_memory("README.md", "").directory(), "");
    }

    #[test]
    fn test_lazy_loading_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("notes.txt");
        fs::write(&file, "hello world").unwrap();

        let candidate = Candidate::from_path(temp_dir.path(), file, 1024);
        assert_eq!(candidate.relative_path(), "notes.txt");
        assert!(!candidate.is_loaded());

        let prefix = candidate.prefix(5).unwrap();
        assert_eq!(prefix.as_ref(), b"hello");
        assert!(!candidate.is_loaded());

        assert_eq!(candidate.content().unwrap(), b"hello world");
        assert!(candidate.is_loaded());
        assert!(candidate.warning().is_none());
    }

    #[test]
    fn test_content_cap_records_warning() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("big.txt");
        fs::write(&file, "0123456789").unwrap();

        let candidate = Candidate::from_path(temp_dir.path(), file, 4);
        assert!(candidate.content().is_none());
        let warning = candidate.warning().unwrap();
        assert_eq!(warning.category, WarningCategory::TooLarge);
    }

    #[test]
    fn test_missing_file_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("gone.txt");

        let candidate = Candidate::from_path(temp_dir.path(), file, 1024);
        assert_eq!(candidate.size_bytes(), 0);
        assert!(candidate.content().is_none());
        assert_eq!(
            candidate.warning().unwrap().category,
            WarningCategory::MetadataFailed
        );
    }
}
