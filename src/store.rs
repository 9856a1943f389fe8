//! Content-addressed archive storage.
//!
//! Archived files live in a flat directory under a name derived purely from
//! their content digest plus the original extension, so byte-identical
//! files land on the same path no matter what they were called. Writes go
//! through a temp file in the same directory and an atomic rename: a crash
//! mid-copy never leaves a partial file at the canonical path, and two
//! concurrent writers racing on the same digest converge on one rename
//! winner with identical bytes.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::FileHash;

/// Copies ingested files into the archive directory, keyed by digest.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical archive file name: `<hex digest><original extension>`.
    pub fn file_name(digest_hex: &str, extension: Option<&str>) -> String {
        match extension {
            Some(ext) => format!("{}.{}", digest_hex, ext),
            None => digest_hex.to_string(),
        }
    }

    /// Archive path for an index row, deriving the extension from the
    /// recorded display name.
    pub fn path_for(&self, digest_hex: &str, display_name: &str) -> PathBuf {
        let ext = Path::new(display_name)
            .extension()
            .and_then(|e| e.to_str());
        self.root.join(Self::file_name(digest_hex, ext))
    }

    /// Copy the hashed file to its canonical archive path and return that
    /// path. Re-archiving content that is already present performs no
    /// write — re-ingest is idempotent.
    pub fn archive(&self, file_hash: &FileHash) -> Result<PathBuf> {
        let ext = file_hash
            .source_path
            .extension()
            .and_then(|e| e.to_str());
        let dest = self
            .root
            .join(Self::file_name(&file_hash.digest_hex(), ext));

        if dest.exists() {
            return Ok(dest);
        }

        let mut source =
            File::open(&file_hash.source_path).map_err(|e| Error::io(&file_hash.source_path, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|e| Error::io(&self.root, e))?;
        std::io::copy(&mut source, &mut tmp).map_err(|e| Error::io(&file_hash.source_path, e))?;

        tmp.persist(&dest).map_err(|e| Error::io(&dest, e.error))?;

        Ok(dest)
    }

    /// Read archived bytes back for an index row.
    pub fn read_for(&self, digest_hex: &str, display_name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(digest_hex, display_name);
        std::fs::read(&path).map_err(|e| Error::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use std::fs;
    use tempfile::TempDir;

    fn hashed_file(dir: &TempDir, name: &str, content: &[u8]) -> FileHash {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        hash::hash_file(&path).unwrap()
    }

    #[test]
    fn test_archive_uses_canonical_name() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let file_hash = hashed_file(&src, "dragon.jpg", b"dragon bytes");
        let dest = store.archive(&file_hash).unwrap();

        let expected = format!("{}.jpg", file_hash.digest_hex());
        assert_eq!(dest, out.path().join(&expected));
        assert!(dest.exists());
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let content = b"\x00\x01binary image data\xff";
        let file_hash = hashed_file(&src, "img.png", content);
        let dest = store.archive(&file_hash).unwrap();

        assert_eq!(fs::read(dest).unwrap(), content);
        assert_eq!(
            store.read_for(&file_hash.digest_hex(), "img.png").unwrap(),
            content
        );
    }

    #[test]
    fn test_duplicate_content_converges_on_one_file() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let first = hashed_file(&src, "a.jpg", b"same bytes");
        let second = hashed_file(&src, "b.jpg", b"same bytes");

        let dest_a = store.archive(&first).unwrap();
        let dest_b = store.archive(&second).unwrap();

        assert_eq!(dest_a, dest_b);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_rearchive_is_idempotent() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let file_hash = hashed_file(&src, "a.jpg", b"stable");
        let dest = store.archive(&file_hash).unwrap();
        let before = fs::metadata(&dest).unwrap().modified().unwrap();

        store.archive(&file_hash).unwrap();
        let after = fs::metadata(&dest).unwrap().modified().unwrap();

        assert_eq!(before, after);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_extensionless_source() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let file_hash = hashed_file(&src, "noext", b"raw");
        let dest = store.archive(&file_hash).unwrap();
        assert_eq!(dest, out.path().join(file_hash.digest_hex()));
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let file_hash = FileHash {
            source_path: out.path().join("gone.jpg"),
            digest: [7u8; 32],
        };
        assert!(matches!(
            store.archive(&file_hash).unwrap_err(),
            Error::Io { .. }
        ));
    }

    #[test]
    fn test_path_for_matches_archive() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());

        let file_hash = hashed_file(&src, "cat.webp", b"cat");
        let dest = store.archive(&file_hash).unwrap();
        assert_eq!(store.path_for(&file_hash.digest_hex(), "cat.webp"), dest);
    }
}
