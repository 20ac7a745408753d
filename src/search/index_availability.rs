//! Index-directory availability checks (spec.md §4.5.4 "index strategy
//! selection"), grounded in the original's `isContentIndexAvailable` /
//! `isFileNameIndexDirectoryAvailable` / `isPathInContentIndexDirectory` /
//! `isPathInFileNameIndexDirectory`.
//!
//! The actual index engine (Lucene-equivalent) is out of scope (spec.md
//! §1 Non-goals); these checks only look at the directory/sidecar shape
//! a real index leaves behind, so a strategy can decide indexed-vs-
//! realtime without depending on the index engine itself.

use std::path::Path;

use crate::config::{content_index_dir, default_search_root, filename_index_dir};

/// True when `dir` looks like a populated index: exists, is a
/// directory, and is non-empty.
fn looks_like_populated_index(dir: &Path) -> bool {
    dir.is_dir()
        && dir
            .read_dir()
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
}

/// The content index's `index_status.json` sidecar is present, parses as
/// JSON, and carries a non-empty `lastUpdateTime` field.
fn has_valid_status_sidecar(dir: &Path) -> bool {
    let status_file = dir.join("index_status.json");
    let Ok(contents) = std::fs::read_to_string(&status_file) else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&contents) else {
        return false;
    };
    value
        .get("lastUpdateTime")
        .and_then(|v| v.as_str())
        .map(|s| !s.is_empty())
        .unwrap_or(false)
}

/// Whether the content index is usable (spec.md §4.5.4, grounded in
/// `isContentIndexAvailable`).
pub fn is_content_index_available() -> bool {
    let dir = content_index_dir();
    looks_like_populated_index(&dir) && has_valid_status_sidecar(&dir)
}

/// Whether the filename index is usable (spec.md §4.5.4, grounded in
/// `isFileNameIndexDirectoryAvailable`).
pub fn is_filename_index_directory_available(uid: u32) -> bool {
    looks_like_populated_index(&filename_index_dir(uid))
}

/// `path` falls under a directory the content index actually covers
/// (spec.md §4.5.4, grounded in `isPathInContentIndexDirectory`).
pub fn is_path_in_content_index_directory(path: &str) -> bool {
    if !is_content_index_available() {
        return false;
    }
    let root = default_search_root();
    path.starts_with(&*root.to_string_lossy())
}

/// `path` falls under a directory the filename index actually covers
/// (spec.md §4.5.4, grounded in `isPathInFileNameIndexDirectory`).
pub fn is_path_in_filename_index_directory(path: &str, uid: u32) -> bool {
    if !is_filename_index_directory_available(uid) {
        return false;
    }
    let root = default_search_root();
    path.starts_with(&*root.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_is_not_a_populated_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!looks_like_populated_index(dir.path()));
    }

    #[test]
    fn directory_with_a_segment_file_is_populated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("segments.gen"), b"").unwrap();
        assert!(looks_like_populated_index(dir.path()));
    }

    #[test]
    fn sidecar_with_empty_timestamp_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index_status.json"), r#"{"lastUpdateTime":""}"#).unwrap();
        assert!(!has_valid_status_sidecar(dir.path()));
    }

    #[test]
    fn sidecar_with_timestamp_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index_status.json"), r#"{"lastUpdateTime":"2026-01-01T00:00:00Z"}"#).unwrap();
        assert!(has_valid_status_sidecar(dir.path()));
    }

    #[test]
    fn missing_sidecar_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_valid_status_sidecar(dir.path()));
    }
}
