//! Handlers for job submission, status polling, and queue status.
//!
//! Submission returns as soon as the record is persisted and the
//! job is enqueued: submission latency is independent of synthesis
//! latency. Everything after that is observed by polling the
//! status endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use vocalis_core::error::CoreError;
use vocalis_core::output::artifact_rel_path;
use vocalis_core::types::{JobId, Timestamp};
use vocalis_core::voice::{validate_user_id, voice_slug};
use vocalis_store::{JobRecord, JobStatus};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/tts`.
#[derive(Debug, Deserialize)]
pub struct SubmitTts {
    pub user_id: String,
    pub voice_name: String,
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".into()
}

/// Response for `POST /api/v1/tts` (202 Accepted).
#[derive(Debug, Serialize)]
pub struct SubmitTtsResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    /// Best-effort queue position at submission time.
    pub queue_position: usize,
}

/// Status-shaped response for `GET /api/v1/tts/{job_id}`.
///
/// The variant (and therefore the set of fields) depends on the
/// job's current state; `status` is the discriminant.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatusResponse {
    Queued {
        job_id: JobId,
        /// Approximate; under concurrent submission this is a
        /// best-effort pending count, not an exact rank.
        queue_position: usize,
        created_at: Timestamp,
    },
    Processing {
        job_id: JobId,
        created_at: Timestamp,
        started_at: Option<Timestamp>,
    },
    Completed {
        job_id: JobId,
        audio_url: String,
        created_at: Timestamp,
        completed_at: Option<Timestamp>,
    },
    Failed {
        job_id: JobId,
        error: String,
        created_at: Timestamp,
        failed_at: Option<Timestamp>,
    },
}

impl JobStatusResponse {
    fn from_record(record: JobRecord, queue_depth: usize) -> Self {
        match record.status {
            JobStatus::Queued => JobStatusResponse::Queued {
                job_id: record.job_id,
                queue_position: queue_depth.max(1),
                created_at: record.created_at,
            },
            JobStatus::Processing => JobStatusResponse::Processing {
                job_id: record.job_id,
                created_at: record.created_at,
                started_at: record.started_at,
            },
            JobStatus::Completed => JobStatusResponse::Completed {
                job_id: record.job_id,
                audio_url: record.audio_url.unwrap_or_default(),
                created_at: record.created_at,
                completed_at: record.completed_at,
            },
            JobStatus::Failed => JobStatusResponse::Failed {
                job_id: record.job_id,
                error: record.error.unwrap_or_default(),
                created_at: record.created_at,
                failed_at: record.failed_at,
            },
        }
    }
}

/// Payload for `GET /api/v1/queue`.
#[derive(Debug, Serialize)]
pub struct QueueStatus {
    /// Approximate number of jobs waiting for the worker.
    pub pending: usize,
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/tts
///
/// Submit a synthesis job. Validates that the referenced voice
/// asset exists, persists a `queued` record, enqueues the job, and
/// returns 202 immediately. Nothing is created when validation
/// fails.
pub async fn submit_tts(
    State(state): State<AppState>,
    Json(input): Json<SubmitTts>,
) -> AppResult<impl IntoResponse> {
    validate_user_id(&input.user_id)?;
    let voice_id = voice_slug(&input.voice_name)?;

    if input.text.trim().is_empty() {
        return Err(CoreError::Validation("Text must not be empty".into()).into());
    }

    if !state.voices.exists(&input.user_id, &voice_id).await {
        return Err(CoreError::NotFound {
            entity: "Voice",
            id: format!("{}/{voice_id}", input.user_id),
        }
        .into());
    }

    let job_id = JobId::new();
    let output_path = state
        .config
        .outputs_dir
        .join(artifact_rel_path(&input.user_id, &voice_id, &job_id));

    let record = JobRecord::queued(
        job_id.clone(),
        &input.user_id,
        &voice_id,
        &input.text,
        &input.language,
        output_path,
    );
    state.store.create(&record).await?;
    state.queue.enqueue(job_id.clone())?;

    tracing::info!(
        job_id = %job_id,
        user_id = %input.user_id,
        voice_id = %voice_id,
        language = %input.language,
        text_len = input.text.len(),
        "Job submitted",
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitTtsResponse {
            job_id,
            status: JobStatus::Queued,
            queue_position: state.queue.len(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/tts/{job_id}
///
/// Poll a job's status. The response shape depends on the current
/// state; see [`JobStatusResponse`].
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<JobStatusResponse>> {
    let job_id = JobId::from(job_id);
    let record = state
        .store
        .read(&job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })?;

    Ok(Json(JobStatusResponse::from_record(
        record,
        state.queue.len(),
    )))
}

// ---------------------------------------------------------------------------
// Queue status
// ---------------------------------------------------------------------------

/// GET /api/v1/queue
///
/// Informational queue depth. Approximate by design; clients must
/// not treat it as authoritative.
pub async fn queue_status(State(state): State<AppState>) -> Json<DataResponse<QueueStatus>> {
    Json(DataResponse {
        data: QueueStatus {
            pending: state.queue.len(),
        },
    })
}
