//! Job record entity and update types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vocalis_core::types::{JobId, Timestamp};

/// Lifecycle status of a synthesis job.
///
/// Transitions are monotonic and one-directional:
/// `queued → processing → {completed | failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted per-job document.
///
/// Created once by the submission handler, mutated only by the
/// worker afterwards. This record is the sole source of truth for
/// job status; the queue holds only transient references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,

    // Input reference — immutable after creation.
    pub user_id: String,
    pub voice_id: String,
    pub text: String,
    pub language: String,

    pub status: JobStatus,

    /// Where the worker will write the artifact. Computed
    /// deterministically at submission from the job id and the
    /// voice namespace.
    pub output_path: PathBuf,

    /// Public URL of the produced artifact. Set iff `completed`.
    pub audio_url: Option<String>,

    /// Human-readable failure description. Set iff `failed`.
    pub error: Option<String>,

    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
}

impl JobRecord {
    /// Build a fresh `queued` record at submission time.
    pub fn queued(
        job_id: JobId,
        user_id: impl Into<String>,
        voice_id: impl Into<String>,
        text: impl Into<String>,
        language: impl Into<String>,
        output_path: PathBuf,
    ) -> Self {
        JobRecord {
            job_id,
            user_id: user_id.into(),
            voice_id: voice_id.into(),
            text: text.into(),
            language: language.into(),
            status: JobStatus::Queued,
            output_path,
            audio_url: None,
            error: None,
            created_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
            failed_at: None,
        }
    }
}

/// Field-level changes applied to a record by [`JobStore::update`].
///
/// Only `Some` fields are written; the store persists the full
/// record after applying them.
///
/// [`JobStore::update`]: crate::JobStore::update
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub audio_url: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
}

impl JobUpdate {
    /// Transition to `processing`, stamping `started_at`.
    pub fn processing(started_at: Timestamp) -> Self {
        JobUpdate {
            status: Some(JobStatus::Processing),
            started_at: Some(started_at),
            ..Default::default()
        }
    }

    /// Terminal transition to `completed` with the output reference.
    pub fn completed(audio_url: impl Into<String>, completed_at: Timestamp) -> Self {
        JobUpdate {
            status: Some(JobStatus::Completed),
            audio_url: Some(audio_url.into()),
            completed_at: Some(completed_at),
            ..Default::default()
        }
    }

    /// Terminal transition to `failed` with a human-readable error.
    pub fn failed(error: impl Into<String>, failed_at: Timestamp) -> Self {
        JobUpdate {
            status: Some(JobStatus::Failed),
            error: Some(error.into()),
            failed_at: Some(failed_at),
            ..Default::default()
        }
    }

    /// Apply the changes to a record in place.
    pub fn apply(&self, record: &mut JobRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(url) = &self.audio_url {
            record.audio_url = Some(url.clone());
        }
        if let Some(error) = &self.error {
            record.error = Some(error.clone());
        }
        if let Some(t) = self.started_at {
            record.started_at = Some(t);
        }
        if let Some(t) = self.completed_at {
            record.completed_at = Some(t);
        }
        if let Some(t) = self.failed_at {
            record.failed_at = Some(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocalis_core::types::JobId;

    fn record() -> JobRecord {
        JobRecord::queued(
            JobId::new(),
            "alice",
            "my_voice",
            "hello",
            "en",
            PathBuf::from("/outputs/alice/my_voice/x.wav"),
        )
    }

    #[test]
    fn fresh_record_is_queued_with_no_result_fields() {
        let r = record();
        assert_eq!(r.status, JobStatus::Queued);
        assert!(r.audio_url.is_none());
        assert!(r.error.is_none());
        assert!(r.started_at.is_none());
    }

    #[test]
    fn completed_update_sets_url_and_timestamp_only() {
        let mut r = record();
        let now = chrono::Utc::now();
        JobUpdate::processing(now).apply(&mut r);
        JobUpdate::completed("/outputs/a.wav", now).apply(&mut r);

        assert_eq!(r.status, JobStatus::Completed);
        assert_eq!(r.audio_url.as_deref(), Some("/outputs/a.wav"));
        assert!(r.error.is_none());
        assert!(r.completed_at.is_some());
        assert!(r.failed_at.is_none());
    }

    #[test]
    fn failed_update_sets_error_not_url() {
        let mut r = record();
        let now = chrono::Utc::now();
        JobUpdate::failed("engine exploded", now).apply(&mut r);

        assert_eq!(r.status, JobStatus::Failed);
        assert_eq!(r.error.as_deref(), Some("engine exploded"));
        assert!(r.audio_url.is_none());
        assert!(r.failed_at.is_some());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
    }
}
