//! Fixed-size concurrent hash worker pool.
//!
//! A configurable number of workers pull file paths from a shared bounded
//! job channel and push digests to an unbounded results channel; the caller
//! blocks until every input has produced an outcome. Result order does not
//! match input order — consumers key by path or digest, never by position.
//!
//! Failure policy: a worker's read failure is reported as a per-file error
//! alongside the successes. The pool returns exactly one outcome per input,
//! never fewer, so a single unreadable file cannot silently vanish from a
//! batch.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::{Error, Result};
use crate::hash;
use crate::models::FileHash;

/// Cooperative cancellation shared between the orchestrator, the workers,
/// and an optional batch-timeout timer. Checked at each per-file boundary;
/// a cancelled job still yields an outcome so result counts stay exact.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One per-file result: the input path and its digest or error.
pub type FileOutcome = (PathBuf, Result<FileHash>);

/// Hash every path using `workers` concurrent workers and return exactly
/// one outcome per input, in completion order.
pub async fn hash_files(
    paths: Vec<PathBuf>,
    workers: usize,
    cancel: &CancelFlag,
) -> Vec<FileOutcome> {
    let total = paths.len();
    if total == 0 {
        return Vec::new();
    }

    let (job_tx, job_rx) = mpsc::channel::<PathBuf>(total);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<FileOutcome>();

    for _ in 0..workers.max(1) {
        let job_rx = Arc::clone(&job_rx);
        let result_tx = result_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                let job = { job_rx.lock().await.recv().await };
                let Some(path) = job else { break };
                let outcome = if cancel.is_cancelled() {
                    Err(Error::Cancelled)
                } else {
                    hash::hash_file(&path)
                };
                if result_tx.send((path, outcome)).is_err() {
                    break;
                }
            }
        });
    }
    drop(result_tx);

    for path in paths {
        // Channel capacity equals the job count, so enqueueing never blocks
        // on slow workers. A send fails only if every worker died, in which
        // case the results channel closes and collection ends.
        if job_tx.send(path).await.is_err() {
            break;
        }
    }
    drop(job_tx);

    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = result_rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_files(dir: &TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("file-{}.jpg", i));
                fs::write(&path, format!("content {}", i)).unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_outcome_per_input() {
        let tmp = TempDir::new().unwrap();
        let paths = write_files(&tmp, 10);

        for workers in [1, 3, 8] {
            let outcomes = hash_files(paths.clone(), workers, &CancelFlag::new()).await;
            assert_eq!(outcomes.len(), 10, "workers={}", workers);

            let seen: HashSet<_> = outcomes.iter().map(|(p, _)| p.clone()).collect();
            assert_eq!(seen.len(), 10);
            assert!(outcomes.iter().all(|(_, r)| r.is_ok()));
        }
    }

    #[tokio::test]
    async fn test_unreadable_file_reported_not_dropped() {
        let tmp = TempDir::new().unwrap();
        let mut paths = write_files(&tmp, 3);
        paths.push(tmp.path().join("missing.jpg"));

        let outcomes = hash_files(paths, 3, &CancelFlag::new()).await;
        assert_eq!(outcomes.len(), 4);

        let failures: Vec<_> = outcomes.iter().filter(|(_, r)| r.is_err()).collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].0.ends_with("missing.jpg"));
        assert!(matches!(failures[0].1, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_more_workers_than_jobs() {
        let tmp = TempDir::new().unwrap();
        let paths = write_files(&tmp, 2);

        let outcomes = hash_files(paths, 16, &CancelFlag::new()).await;
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcomes = hash_files(Vec::new(), 3, &CancelFlag::new()).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_batch_yields_cancelled_outcomes() {
        let tmp = TempDir::new().unwrap();
        let paths = write_files(&tmp, 5);

        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcomes = hash_files(paths, 3, &cancel).await;
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes
            .iter()
            .all(|(_, r)| matches!(r, Err(Error::Cancelled))));
    }

    #[tokio::test]
    async fn test_digests_match_direct_hashing() {
        let tmp = TempDir::new().unwrap();
        let paths = write_files(&tmp, 4);

        let outcomes = hash_files(paths.clone(), 2, &CancelFlag::new()).await;
        for (path, outcome) in outcomes {
            let direct = hash::hash_file(&path).unwrap();
            assert_eq!(outcome.unwrap().digest, direct.digest);
        }
    }
}
