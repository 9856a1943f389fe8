//! Ingestion pipeline orchestration.
//!
//! Coordinates the full consume flow: scan → hash (worker pool) → archive
//! (content store) → record (index). Per-file failures are collected into
//! the report instead of aborting the batch, so one corrupt file never
//! blocks the rest of the directory. Duplicate content surfaces as a
//! constraint violation from the index and is counted, not applied — the
//! first recorded display name wins.

use std::fs;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::models::IngestReport;
use crate::pool::{self, CancelFlag};
use crate::scan;
use crate::store::ContentStore;

pub async fn run_ingest(config: &Config, pool: &SqlitePool) -> Result<IngestReport> {
    let ingest_cfg = &config.ingest;

    // Startup-time failures are fatal: without both directories there is
    // no half-initialized state worth continuing in.
    fs::create_dir_all(&ingest_cfg.consume_dir)
        .map_err(|e| Error::io(&ingest_cfg.consume_dir, e))?;
    fs::create_dir_all(&ingest_cfg.archive_dir)
        .map_err(|e| Error::io(&ingest_cfg.archive_dir, e))?;

    let files = scan::scan_consume_dir(ingest_cfg)?;

    let cancel = CancelFlag::new();
    if let Some(secs) = ingest_cfg.timeout_secs {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            cancel.cancel();
        });
    }

    let outcomes = pool::hash_files(files, ingest_cfg.workers, &cancel).await;

    let store = ContentStore::new(&ingest_cfg.archive_dir);
    let index = Index::new(pool.clone());

    let mut report = IngestReport {
        scanned: outcomes.len(),
        ..IngestReport::default()
    };

    for (path, outcome) in outcomes {
        if cancel.is_cancelled() {
            report
                .failures
                .push((path, Error::Cancelled.to_string()));
            continue;
        }

        let file_hash = match outcome {
            Ok(h) => h,
            Err(e) => {
                report.failures.push((path, e.to_string()));
                continue;
            }
        };

        if let Err(e) = store.archive(&file_hash) {
            report.failures.push((path, e.to_string()));
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_hash.digest_hex());

        match index.create_image(&file_hash.digest_hex(), &name).await {
            Ok(_) => report.archived += 1,
            Err(Error::ConstraintViolation { .. }) => report.duplicates += 1,
            Err(e) => report.failures.push((path, e.to_string())),
        }
    }

    println!("ingest {}", ingest_cfg.consume_dir.display());
    println!("  scanned: {} files", report.scanned);
    println!("  archived: {} new images", report.archived);
    println!("  duplicates: {}", report.duplicates);
    println!("  failures: {}", report.failures.len());
    for (path, reason) in &report.failures {
        println!("    {}: {}", path.display(), reason);
    }
    println!("ok");

    Ok(report)
}
