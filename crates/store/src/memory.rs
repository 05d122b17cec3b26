//! In-memory job store for tests and embedded use.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vocalis_core::types::JobId;

use crate::job_store::{JobStore, StoreError};
use crate::models::{JobRecord, JobUpdate};

/// Map-backed [`JobStore`]. Not durable; drop-in replacement for
/// [`FsJobStore`](crate::FsJobStore) behind the same contract.
#[derive(Default)]
pub struct MemoryJobStore {
    records: RwLock<HashMap<JobId, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, record: &JobRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.job_id) {
            return Err(StoreError::AlreadyExists(record.job_id.clone()));
        }
        records.insert(record.job_id.clone(), record.clone());
        Ok(())
    }

    async fn read(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update(&self, id: &JobId, update: JobUpdate) -> Result<JobRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        update.apply(record);
        Ok(record.clone())
    }

    async fn list(&self) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
