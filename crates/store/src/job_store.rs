//! The job record store abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use vocalis_core::types::JobId;

use crate::models::{JobRecord, JobUpdate};

/// Errors from job record persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `create` was called with an id that already has a record.
    /// Should not happen given UUID generation, but the contract
    /// rejects it rather than silently overwriting.
    #[error("Job record already exists: {0}")]
    AlreadyExists(JobId),

    /// `update` was called for an id with no record.
    #[error("Job record not found: {0}")]
    NotFound(JobId),

    /// Underlying storage failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be decoded.
    #[error("Corrupt job record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Key-value store of per-job records.
///
/// One writer mutates any given record at a time (the submission
/// handler once at creation, the worker thereafter); readers may be
/// concurrent. Implementations must persist the full record on
/// every successful `create`/`update` so `read` always reflects the
/// latest completed write, never a partial one.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a brand-new record. Fails with
    /// [`StoreError::AlreadyExists`] if the id is taken.
    async fn create(&self, record: &JobRecord) -> Result<(), StoreError>;

    /// Fetch a record, or `None` if the id is unknown.
    async fn read(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError>;

    /// Apply field changes and persist the full updated record.
    /// Fails with [`StoreError::NotFound`] if the id is unknown.
    async fn update(&self, id: &JobId, update: JobUpdate) -> Result<JobRecord, StoreError>;

    /// All records, in no particular order. Used by the startup
    /// recovery sweep and admin reporting; not a hot path.
    async fn list(&self) -> Result<Vec<JobRecord>, StoreError>;
}

/// Shared trait-object handle used by the API state and the worker.
pub type DynJobStore = Arc<dyn JobStore>;
