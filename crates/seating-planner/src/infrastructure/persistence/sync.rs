//! Background sync of committed changes to a [`PlanStore`].
//!
//! ```text
//! LayoutController ──► take_persist_ops() ──► SyncQueue::enqueue
//!                                                   │  (resolve ids to records
//!                                                   │   against the committed plan)
//!                                                   ▼
//!                                        mpsc ──► worker task ──► PlanStore
//! ```
//!
//! Records are resolved when they are enqueued, so the worker writes exactly
//! the state the user saw when the command finished.  Writes are best-effort:
//! a failed write is logged and dropped; the local plan stays authoritative.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use seating_core::{Guest, GuestId, SeatingPlan, TableId, TableRecord};

use super::{PlanStore, StoreError};
use crate::application::assignment::PersistOp;

/// One write for the store, carrying the record as it was when committed.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncJob {
    SaveTable(TableRecord),
    SaveGuest(Guest),
    DeleteTable(TableId),
    DeleteGuest(GuestId),
}

impl SyncJob {
    /// Resolves `op` against `plan`.
    ///
    /// Returns `None` for a save whose record no longer exists (it was
    /// deleted later in the same batch, and the delete job covers it).
    pub fn resolve(plan: &SeatingPlan, op: PersistOp) -> Option<SyncJob> {
        match op {
            PersistOp::SaveTable(id) => plan.table_record(id).map(SyncJob::SaveTable),
            PersistOp::SaveGuest(id) => plan.guest_record(id).map(SyncJob::SaveGuest),
            PersistOp::DeleteTable(id) => Some(SyncJob::DeleteTable(id)),
            PersistOp::DeleteGuest(id) => Some(SyncJob::DeleteGuest(id)),
        }
    }

    async fn apply(self, store: &dyn PlanStore) -> Result<(), StoreError> {
        match self {
            SyncJob::SaveTable(record) => store.save_table(record).await,
            SyncJob::SaveGuest(guest) => store.save_guest(guest).await,
            SyncJob::DeleteTable(id) => store.delete_table(id).await,
            SyncJob::DeleteGuest(id) => store.delete_guest(id).await,
        }
    }
}

/// Totals reported by the worker when the queue closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub applied: usize,
    pub failed: usize,
}

/// Sending half of the sync pipeline.
///
/// Dropping every `SyncQueue` clone closes the channel; the worker then
/// drains the remaining jobs and its [`JoinHandle`] yields the [`SyncStats`].
#[derive(Debug, Clone)]
pub struct SyncQueue {
    tx: mpsc::UnboundedSender<SyncJob>,
}

impl SyncQueue {
    /// Spawns the worker task on the current Tokio runtime.
    pub fn spawn(store: Arc<dyn PlanStore>) -> (SyncQueue, JoinHandle<SyncStats>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(store, rx));
        (SyncQueue { tx }, worker)
    }

    /// Resolves `ops` against `plan` and queues the resulting jobs.
    ///
    /// Returns the number of jobs queued.  Never blocks.
    pub fn enqueue(&self, plan: &SeatingPlan, ops: Vec<PersistOp>) -> usize {
        let mut queued = 0;
        for op in ops {
            let Some(job) = SyncJob::resolve(plan, op) else {
                debug!(?op, "skipping save of a record that no longer exists");
                continue;
            };
            if self.tx.send(job).is_err() {
                warn!(?op, "sync worker has stopped; change will not be persisted");
                continue;
            }
            queued += 1;
        }
        queued
    }
}

async fn run_worker(
    store: Arc<dyn PlanStore>,
    mut rx: mpsc::UnboundedReceiver<SyncJob>,
) -> SyncStats {
    let mut stats = SyncStats::default();
    while let Some(job) = rx.recv().await {
        let label = job_label(&job);
        match job.apply(store.as_ref()).await {
            Ok(()) => {
                stats.applied += 1;
                debug!(job = %label, "persisted");
            }
            Err(e) => {
                stats.failed += 1;
                warn!(job = %label, error = %e, "failed to persist change");
            }
        }
    }
    info!(applied = stats.applied, failed = stats.failed, "sync worker stopped");
    stats
}

fn job_label(job: &SyncJob) -> String {
    match job {
        SyncJob::SaveTable(r) => format!("save table {}", r.id),
        SyncJob::SaveGuest(g) => format!("save guest {}", g.id),
        SyncJob::DeleteTable(id) => format!("delete table {id}"),
        SyncJob::DeleteGuest(id) => format!("delete guest {id}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
