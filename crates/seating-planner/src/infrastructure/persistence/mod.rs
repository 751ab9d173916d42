//! Persistence adapters for the hosted plan store.
//!
//! The planner never blocks on the store: it commits changes locally and the
//! [`sync`] worker forwards them afterwards.  [`PlanStore`] is the seam; two
//! adapters ship with the crate:
//!
//! - [`MemoryStore`]   – keeps records in memory (tests, dry runs).
//! - [`JsonFileStore`] – keeps the whole plan in one JSON snapshot file.
//!
//! Any hosted backend only needs to implement the five trait methods.

pub mod sync;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use seating_core::{Guest, GuestId, PlanSnapshot, TableId, TableRecord};

/// Error type for plan store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing plan store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored plan is not valid JSON, or could not be encoded.
    #[error("plan store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend refused the write.
    #[error("plan store rejected the request: {0}")]
    Rejected(String),
}

/// Reads and writes individual plan records.
///
/// Implementations must be safe to call from the background sync task.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Returns every stored table and guest.
    async fn load(&self) -> Result<PlanSnapshot, StoreError>;
    /// Inserts or replaces a table record.
    async fn save_table(&self, record: TableRecord) -> Result<(), StoreError>;
    /// Inserts or replaces a guest record.
    async fn save_guest(&self, guest: Guest) -> Result<(), StoreError>;
    /// Deletes a table record.  Deleting a missing record is not an error.
    async fn delete_table(&self, table_id: TableId) -> Result<(), StoreError>;
    /// Deletes a guest record.  Deleting a missing record is not an error.
    async fn delete_guest(&self, guest_id: GuestId) -> Result<(), StoreError>;
}

// ── Snapshot editing shared by the adapters ──────────────────────────────────

fn upsert_table(snapshot: &mut PlanSnapshot, record: TableRecord) {
    match snapshot.tables.iter_mut().find(|t| t.id == record.id) {
        Some(existing) => *existing = record,
        None => snapshot.tables.push(record),
    }
}

fn upsert_guest(snapshot: &mut PlanSnapshot, guest: Guest) {
    match snapshot.guests.iter_mut().find(|g| g.id == guest.id) {
        Some(existing) => *existing = guest,
        None => snapshot.guests.push(guest),
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// Keeps the plan in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<PlanSnapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: PlanSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Returns a copy of everything stored so far.
    pub async fn contents(&self) -> PlanSnapshot {
        self.snapshot.lock().await.clone()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn load(&self) -> Result<PlanSnapshot, StoreError> {
        Ok(self.contents().await)
    }

    async fn save_table(&self, record: TableRecord) -> Result<(), StoreError> {
        upsert_table(&mut *self.snapshot.lock().await, record);
        Ok(())
    }

    async fn save_guest(&self, guest: Guest) -> Result<(), StoreError> {
        upsert_guest(&mut *self.snapshot.lock().await, guest);
        Ok(())
    }

    async fn delete_table(&self, table_id: TableId) -> Result<(), StoreError> {
        self.snapshot.lock().await.tables.retain(|t| t.id != table_id);
        Ok(())
    }

    async fn delete_guest(&self, guest_id: GuestId) -> Result<(), StoreError> {
        self.snapshot.lock().await.guests.retain(|g| g.id != guest_id);
        Ok(())
    }
}

// ── JsonFileStore ─────────────────────────────────────────────────────────────

/// Keeps the whole plan in a single pretty-printed JSON file.
///
/// Every write rewrites the file from the cached snapshot, so the file is
/// always a complete [`PlanSnapshot`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Option<PlanSnapshot>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<PlanSnapshot, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "plan file absent, starting empty");
                Ok(PlanSnapshot::default())
            }
            Err(e) => Err(StoreError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    async fn write_file(&self, snapshot: &PlanSnapshot) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Applies `edit` to the cached snapshot (loading it first if needed) and
    /// writes the result back.
    async fn modify<F>(&self, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PlanSnapshot) + Send,
    {
        let mut cache = self.cache.lock().await;
        let mut snapshot = match cache.take() {
            Some(s) => s,
            None => self.read_file().await?,
        };
        edit(&mut snapshot);
        let written = self.write_file(&snapshot).await;
        *cache = Some(snapshot);
        written
    }
}

#[async_trait]
impl PlanStore for JsonFileStore {
    async fn load(&self) -> Result<PlanSnapshot, StoreError> {
        let snapshot = self.read_file().await?;
        *self.cache.lock().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn save_table(&self, record: TableRecord) -> Result<(), StoreError> {
        self.modify(|s| upsert_table(s, record)).await
    }

    async fn save_guest(&self, guest: Guest) -> Result<(), StoreError> {
        self.modify(|s| upsert_guest(s, guest)).await
    }

    async fn delete_table(&self, table_id: TableId) -> Result<(), StoreError> {
        self.modify(|s| s.tables.retain(|t| t.id != table_id)).await
    }

    async fn delete_guest(&self, guest_id: GuestId) -> Result<(), StoreError> {
        self.modify(|s| s.guests.retain(|g| g.id != guest_id)).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
