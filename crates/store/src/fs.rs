//! Filesystem-backed job store: one JSON document per job.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vocalis_core::types::JobId;

use crate::job_store::{JobStore, StoreError};
use crate::models::{JobRecord, JobUpdate};

/// Durable job store writing `{job_id}.json` files under a root
/// directory.
///
/// Every write lands in a temp file first and is moved into place
/// with `rename`, so a concurrent `read` sees either the previous
/// or the new complete document, never a torn one.
pub struct FsJobStore {
    root: PathBuf,
}

impl FsJobStore {
    /// Open a store rooted at `root`, creating the directory if
    /// needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(FsJobStore { root })
    }

    fn record_path(&self, id: &JobId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    async fn write_record(&self, record: &JobRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(record).map_err(|e| StoreError::Corrupt {
            id: record.job_id.to_string(),
            reason: e.to_string(),
        })?;

        let final_path = self.record_path(&record.job_id);
        let tmp_path = final_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &final_path).await?;
        Ok(())
    }

    async fn read_record(&self, path: &Path, id: &str) -> Result<JobRecord, StoreError> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl JobStore for FsJobStore {
    async fn create(&self, record: &JobRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.job_id);
        if tokio::fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists(record.job_id.clone()));
        }
        self.write_record(record).await
    }

    async fn read(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        let path = self.record_path(id);
        match self.read_record(&path, id.as_str()).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(&self, id: &JobId, update: JobUpdate) -> Result<JobRecord, StoreError> {
        let mut record = self
            .read(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        update.apply(&mut record);
        self.write_record(&record).await?;
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<JobRecord>, StoreError> {
        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            match self.read_record(&path, &id).await {
                Ok(record) => records.push(record),
                // A corrupt or vanished file must not take down the
                // whole listing (recovery sweep runs over this).
                Err(e) => {
                    tracing::warn!(record = %path.display(), error = %e, "Skipping unreadable job record");
                }
            }
        }

        Ok(records)
    }
}
