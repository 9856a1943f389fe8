//! Consume-directory enumeration.
//!
//! Walks the watch directory and returns every regular file matching the
//! configured include/exclude globs. The root directory entry itself and
//! any subdirectory entries are skipped; only file paths reach the hasher.

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use std::path::PathBuf;

use crate::config::IngestConfig;
use crate::error::{Error, Result};

/// Enumerate ingestable files under the consume directory, sorted for
/// deterministic ordering.
pub fn scan_consume_dir(config: &IngestConfig) -> Result<Vec<PathBuf>> {
    let root = &config.consume_dir;

    let include_set = build_globset(&config.include_globs)?;
    let exclude_set = build_globset(&config.exclude_globs)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(PathBuf::from).unwrap_or_else(|| root.clone());
            match e.into_io_error() {
                Some(io) => Error::io(&path, io),
                None => Error::io(&path, std::io::Error::other("walk error")),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }

        if !include_set.is_match(&rel_str) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();

    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::malformed(format!("invalid glob '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::malformed(format!("invalid glob set: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ingest_config(root: &std::path::Path) -> IngestConfig {
        IngestConfig {
            consume_dir: root.to_path_buf(),
            archive_dir: root.join("archive"),
            workers: 3,
            timeout_secs: None,
            include_globs: vec!["**/*.jpg".to_string(), "**/*.png".to_string()],
            exclude_globs: vec![],
        }
    }

    #[test]
    fn test_scan_files_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.jpg"), b"a").unwrap();
        fs::write(tmp.path().join("b.png"), b"b").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/c.jpg"), b"c").unwrap();

        let files = scan_consume_dir(&ingest_config(tmp.path())).unwrap();
        assert_eq!(files.len(), 3);
        // The root and the nested directory entries are not in the list.
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_scan_applies_include_globs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.jpg"), b"a").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"not an image").unwrap();

        let files = scan_consume_dir(&ingest_config(tmp.path())).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.jpg"));
    }

    #[test]
    fn test_scan_applies_exclude_globs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.jpg"), b"a").unwrap();
        fs::write(tmp.path().join("skip.jpg"), b"b").unwrap();

        let mut config = ingest_config(tmp.path());
        config.exclude_globs = vec!["skip.jpg".to_string()];
        let files = scan_consume_dir(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.jpg"));
    }

    #[test]
    fn test_scan_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let files = scan_consume_dir(&ingest_config(tmp.path())).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("z.jpg"), b"z").unwrap();
        fs::write(tmp.path().join("a.jpg"), b"a").unwrap();
        fs::write(tmp.path().join("m.jpg"), b"m").unwrap();

        let files = scan_consume_dir(&ingest_config(tmp.path())).unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = ingest_config(tmp.path());
        config.include_globs = vec!["[".to_string()];
        let err = scan_consume_dir(&config).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }
}
