//! Streaming SHA-256 content digests.
//!
//! A file's digest is its identity for deduplication: identical bytes
//! always produce the identical digest regardless of the original name.
//! Bytes are streamed through the hasher so large files never have to
//! fit in memory.

use sha2::{Digest, Sha256};

use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::FileHash;

/// Compute the SHA-256 digest of the file at `path`. Read-only.
pub fn hash_file(path: &Path) -> Result<FileHash> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;

    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;

    Ok(FileHash {
        source_path: path.to_path_buf(),
        digest: hasher.finalize().into(),
    })
}
