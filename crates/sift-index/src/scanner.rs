//! Corpus discovery: recursive walk filtered by loader extensions.

use std::path::{Path, PathBuf};

/// Discover source files under `root` matching `extensions` (case-insensitive).
///
/// Hidden files and files matched by gitignore rules are excluded from the
/// walk. Paths are sorted, so batch numbering is reproducible within a call.
/// A missing root is non-fatal: logged as a warning, empty result.
#[must_use]
pub fn scan_corpus(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::warn!(path = %root.display(), "corpus directory does not exist");
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|p| has_extension(p, extensions))
        .collect();

    files.sort();
    tracing::info!(count = files.len(), path = %root.display(), "corpus scan complete");
    files
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
}
