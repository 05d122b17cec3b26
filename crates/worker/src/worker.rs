//! The synthesis worker: a single long-lived task that drains the
//! job queue serially.
//!
//! Exactly one worker runs at a time. The engine holds exclusive
//! in-memory model state, so jobs are intentionally serialized:
//! clients trade queueing delay for never contending over the
//! model. One job's failure never stops the loop.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use vocalis_core::language::resolve_language;
use vocalis_core::output::artifact_url;
use vocalis_core::types::JobId;
use vocalis_engine::{audio, LazyEngine, SynthesisRequest};
use vocalis_store::{DynJobStore, JobRecord, JobUpdate, VoiceLibrary};

use crate::queue::JobReceiver;

/// Single consumer of the job queue.
pub struct SynthesisWorker {
    store: DynJobStore,
    voices: VoiceLibrary,
    engine: LazyEngine,
    receiver: JobReceiver,
}

impl SynthesisWorker {
    pub fn new(
        store: DynJobStore,
        voices: VoiceLibrary,
        engine: LazyEngine,
        receiver: JobReceiver,
    ) -> Self {
        SynthesisWorker {
            store,
            voices,
            engine,
            receiver,
        }
    }

    /// Run until the cancellation token fires or every producer is
    /// dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!("Synthesis worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Synthesis worker shutting down");
                    break;
                }
                next = self.receiver.recv() => {
                    match next {
                        Some(job_id) => self.process_isolated(job_id).await,
                        None => {
                            tracing::info!("Job queue closed, synthesis worker stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Run one job with panic isolation. A panic anywhere in
    /// [`process`](Self::process) (most likely an engine bug) must
    /// not unwind through the loop and kill the worker: the job is
    /// marked failed and the loop keeps draining.
    async fn process_isolated(&mut self, job_id: JobId) {
        let outcome = AssertUnwindSafe(self.process(job_id.clone()))
            .catch_unwind()
            .await;

        if let Err(panic) = outcome {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            tracing::error!(job_id = %job_id, panic = %message, "Job processing panicked");

            if let Err(e) = self
                .store
                .update(
                    &job_id,
                    JobUpdate::failed(
                        format!("Job processing panicked: {message}"),
                        chrono::Utc::now(),
                    ),
                )
                .await
            {
                tracing::error!(job_id = %job_id, error = %e, "Failed to persist panic failure");
            }
        }
    }

    /// Execute one dequeued job through its full state machine.
    ///
    /// Store failures are logged and the loop moves on; they must
    /// not take the worker down with them.
    async fn process(&mut self, job_id: JobId) {
        let record = match self.store.read(&job_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                // Defensive: submission always creates the record
                // before enqueueing.
                tracing::warn!(job_id = %job_id, "Dequeued job has no record, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to load job record, skipping");
                return;
            }
        };

        if let Err(e) = self
            .store
            .update(&job_id, JobUpdate::processing(chrono::Utc::now()))
            .await
        {
            tracing::error!(job_id = %job_id, error = %e, "Failed to mark job processing, skipping");
            return;
        }
        tracing::info!(
            job_id = %job_id,
            user_id = %record.user_id,
            voice_id = %record.voice_id,
            language = %record.language,
            "Job processing started",
        );

        let update = match self.execute(&record).await {
            Ok(audio_url) => {
                tracing::info!(job_id = %job_id, audio_url = %audio_url, "Job completed");
                JobUpdate::completed(audio_url, chrono::Utc::now())
            }
            Err(message) => {
                tracing::error!(job_id = %job_id, error = %message, "Job failed");
                JobUpdate::failed(message, chrono::Utc::now())
            }
        };

        if let Err(e) = self.store.update(&job_id, update).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to persist terminal job state");
        }
    }

    /// Synthesize and write the artifact. Any error becomes the
    /// job's human-readable failure description.
    async fn execute(&mut self, record: &JobRecord) -> Result<String, String> {
        let ref_wav_path = self.voices.ref_wav_path(&record.user_id, &record.voice_id);
        if !self.voices.exists(&record.user_id, &record.voice_id).await {
            return Err(format!(
                "Voice not found: {}/{}",
                record.user_id, record.voice_id
            ));
        }

        let request = SynthesisRequest {
            ref_wav_path,
            language: resolve_language(&record.language).to_string(),
            text: record.text.clone(),
        };

        let engine = self.engine.get().map_err(|e| e.to_string())?;
        let clip = engine
            .synthesize(&request)
            .await
            .map_err(|e| e.to_string())?;

        if let Some(parent) = record.output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create output directory: {e}"))?;
        }
        audio::write_wav(&record.output_path, &clip).map_err(|e| e.to_string())?;

        Ok(artifact_url(
            &record.user_id,
            &record.voice_id,
            &record.job_id,
        ))
    }
}
