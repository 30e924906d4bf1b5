//! Common binary file extensions

use std::collections::HashSet;
use std::sync::LazyLock;

/// Global set of binary file extensions (lowercase, without the leading dot)
pub static BINARY_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Executables and libraries
        "exe", "dll", "so", "dylib", "bin", "o", "obj", "a", "lib", "class", "jar", "war",
        "ear", "pyc", "pyo", "pyd", "wasm", "elf", "com", "out",
        // Archives
        "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "zst", "lz", "lzma", "lz4",
        "cab", "iso", "img",
        // Documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf",
        "epub", "mobi",
        // Images
        "jpg", "jpeg", "png", "gif", "bmp", "ico", "icns", "webp", "tif", "tiff", "psd",
        "avif", "heic", "heif", "raw", "cr2", "nef",
        // Audio
        "mp3", "wav", "flac", "aac", "ogg", "oga", "m4a", "wma", "opus", "mid", "midi",
        // Video
        "mp4", "m4v", "mov", "avi", "mkv", "webm", "wmv", "flv", "mpg", "mpeg", "3gp",
        // Databases
        "db", "sqlite", "sqlite3", "mdb", "accdb", "dbf", "parquet", "avro", "orc",
        // Fonts
        "ttf", "otf", "woff", "woff2", "eot", "fon",
        // Installers and packages
        "msi", "dmg", "pkg", "deb", "rpm", "apk", "ipa", "appimage", "snap", "vsix",
        "nupkg", "whl", "gem", "crate",
        // Misc binary blobs
        "dat", "pak", "swf", "blend", "fbx", "glb", "pdb", "ilk", "node",
    ]
    .into_iter()
    .collect()
});

/// Check an extension (with or without leading dot, any case) against the curated set
pub fn is_binary_extension(extension: &str) -> bool {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.is_empty() {
        return false;
    }
    BINARY_EXTENSIONS.contains(trimmed.to_ascii_lowercase().as_str())
}
