//! Two-phase block/unblock runs with per-file progress reporting
//!
//! A run first materializes the full match list (fixing the progress
//! denominator), then applies the firewall operation to each file in
//! enumeration order, emitting one [`ProgressEvent`] per file over an
//! unbounded channel. A terminal [`ProgressEvent::Completed`] carrying the
//! [`RunSummary`] is always emitted, including for the zero-match case.
//!
//! Individual firewall failures never halt the run: they ride on the
//! per-file event and accumulate in the summary, so the consumer can report
//! failures distinctly from successes.
//!
//! Runs are cooperative about cancellation: the flag in [`RunRequest`] is
//! checked between files, and a cancelled run still terminates with a
//! summary (marked `cancelled`).

use crate::core::firewall::{self, Direction};
use crate::core::scanner::{self, ExtensionSet, ScanOutcome, SkippedRoot};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

/// Everything a run needs, snapshotted up front so concurrent watch-list
/// edits cannot be observed mid-run.
#[derive(Debug)]
pub struct RunRequest {
    pub roots: Vec<String>,
    pub extensions: ExtensionSet,
    pub direction: Direction,
    pub cancel: Arc<AtomicBool>,
}

impl RunRequest {
    pub fn new(roots: Vec<String>, extensions: ExtensionSet, direction: Direction) -> Self {
        Self {
            roots,
            extensions,
            direction,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// One file that could not be processed, with the reason.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Final accounting for a completed (or cancelled) run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub id: Uuid,
    pub direction: Direction,
    /// Number of matched files (the progress denominator).
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    pub skipped_roots: Vec<SkippedRoot>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Progress stream element for one run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// One file has been processed. `error` is set when the firewall call
    /// failed for this file; the run continues either way.
    Applied {
        processed: usize,
        total: usize,
        path: PathBuf,
        error: Option<String>,
    },
    /// Terminal event; emitted exactly once per run.
    Completed(RunSummary),
}

impl ProgressEvent {
    /// Progress percentage, monotonically non-decreasing across a run and
    /// exactly 100 on the terminal event even when nothing matched.
    pub fn percent(&self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            ProgressEvent::Applied {
                processed, total, ..
            } => {
                if *total == 0 {
                    100.0
                } else {
                    *processed as f64 / *total as f64 * 100.0
                }
            }
            ProgressEvent::Completed(_) => 100.0,
        }
    }
}

/// Executes one run, sending progress over `events`.
///
/// Send failures are ignored: a consumer that dropped its receiver simply
/// stops observing, the firewall work still completes.
pub async fn run(request: RunRequest, events: mpsc::UnboundedSender<ProgressEvent>) {
    let RunRequest {
        roots,
        extensions,
        direction,
        cancel,
    } = request;

    let id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        "Starting {direction} run {id} over {} watched folder(s)",
        roots.len()
    );

    // Phase 1: materialize the match list; the walk is blocking I/O.
    let outcome = match tokio::task::spawn_blocking(move || scanner::scan(&roots, &extensions)).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Scan task failed: {e}");
            ScanOutcome::default()
        }
    };

    let total = outcome.matches.len();
    let mut succeeded = 0usize;
    let mut failures = Vec::new();
    let mut cancelled = false;

    // Phase 2: one firewall call per match, in enumeration order.
    for (index, path) in outcome.matches.into_iter().enumerate() {
        if cancel.load(Ordering::Acquire) {
            cancelled = true;
            break;
        }

        let error = match firewall::apply_rule(&path, direction).await {
            Ok(()) => {
                succeeded += 1;
                None
            }
            Err(e) => {
                let reason = e.to_string();
                failures.push(FileFailure {
                    path: path.clone(),
                    reason: reason.clone(),
                });
                Some(reason)
            }
        };

        let _ = events.send(ProgressEvent::Applied {
            processed: index + 1,
            total,
            path,
            error,
        });
    }

    let summary = RunSummary {
        id,
        direction,
        total,
        succeeded,
        failures,
        skipped_roots: outcome.skipped_roots,
        cancelled,
        started_at,
        finished_at: Utc::now(),
    };

    crate::audit::log_run(&summary).await;
    info!(
        "{direction} run {id} finished: {}/{} succeeded, {} failed{}",
        summary.succeeded,
        summary.total,
        summary.failures.len(),
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    let _ = events.send(ProgressEvent::Completed(summary));
}
