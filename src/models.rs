//! Core data models used throughout shoebox.
//!
//! These types represent the hashes, index rows, and reports that flow
//! through the ingestion pipeline and the query layer.

use std::path::PathBuf;

use serde::Serialize;

/// A content digest paired with the file it was computed from.
///
/// Produced by the hasher, consumed by the content store and the
/// orchestrator; never persisted itself.
#[derive(Debug, Clone)]
pub struct FileHash {
    pub source_path: PathBuf,
    pub digest: [u8; 32],
}

impl FileHash {
    /// Lowercase hex rendering of the digest (64 characters).
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// An archived image row. `digest` is unique; `id` is assigned on insert
/// and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    pub id: i64,
    pub digest: String,
    pub name: String,
}

/// A user-assigned label. `name` is unique (case-sensitive).
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Full image view returned by the show path: index row, tag names, and
/// the archived bytes base64-encoded for transport.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDetail {
    pub id: i64,
    pub name: String,
    pub digest: String,
    pub tags: Vec<String>,
    pub content: String,
}

/// Listing entry for the index and search pages: row plus encoded bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ImageListing {
    pub id: i64,
    pub name: String,
    pub content: String,
}

/// Aggregate outcome of one ingestion run. Per-file failures are collected
/// here instead of aborting the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub scanned: usize,
    pub archived: usize,
    pub duplicates: usize,
    pub failures: Vec<(PathBuf, String)>,
}
