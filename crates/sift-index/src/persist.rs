//! JSON directory persistence for the flat index.
//!
//! Layout: `entries.json` holds the serialized entries and is written
//! first; `meta.json` carries format version, dimension, and entry count
//! and is written last. A crash mid-save leaves no valid pair, which
//! `load` treats the same as an absent store.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::index::{FlatIndex, IndexEntry};

const FORMAT_VERSION: u32 = 1;
const META_FILE: &str = "meta.json";
const ENTRIES_FILE: &str = "entries.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    format_version: u32,
    dimension: usize,
    entries: usize,
}

/// Write the index to a directory at `path`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file write
/// fails. Not crash-atomic; see module docs.
pub fn save(index: &FlatIndex, path: &Path) -> Result<(), PersistError> {
    std::fs::create_dir_all(path)?;

    let entries = serde_json::to_vec(index.entries())?;
    std::fs::write(path.join(ENTRIES_FILE), entries)?;

    let meta = Meta {
        format_version: FORMAT_VERSION,
        dimension: index.dimension(),
        entries: index.len(),
    };
    std::fs::write(path.join(META_FILE), serde_json::to_vec_pretty(&meta)?)?;

    tracing::info!(path = %path.display(), entries = index.len(), "index persisted");
    Ok(())
}

/// Read an index back from `path`.
///
/// Any missing or corrupt state — absent directory, absent file, parse
/// failure, version or count mismatch — is reported as `None` so the
/// caller can rebuild from source documents.
#[must_use]
pub fn load(path: &Path) -> Option<FlatIndex> {
    let meta_raw = match std::fs::read(path.join(META_FILE)) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::debug!(path = %path.display(), "no persisted index found");
            return None;
        }
    };
    let meta: Meta = match serde_json::from_slice(&meta_raw) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt index metadata, treating as absent");
            return None;
        }
    };
    if meta.format_version != FORMAT_VERSION {
        tracing::warn!(
            found = meta.format_version,
            expected = FORMAT_VERSION,
            "unsupported index format version, treating as absent"
        );
        return None;
    }

    let entries_raw = match std::fs::read(path.join(ENTRIES_FILE)) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "index entries missing, treating as absent");
            return None;
        }
    };
    let entries: Vec<IndexEntry> = match serde_json::from_slice(&entries_raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt index entries, treating as absent");
            return None;
        }
    };
    if entries.len() != meta.entries {
        tracing::warn!(
            found = entries.len(),
            expected = meta.entries,
            "index entry count mismatch, treating as absent"
        );
        return None;
    }

    match FlatIndex::from_entries(meta.dimension, entries) {
        Ok(index) => {
            tracing::info!(path = %path.display(), entries = index.len(), "index loaded");
            Some(index)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "inconsistent index dimensions, treating as absent");
            None
        }
    }
}
