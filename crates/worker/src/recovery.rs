//! Startup recovery of jobs interrupted by a restart.
//!
//! The queue is in-memory only. After a restart, any record still
//! `queued` or `processing` references a job whose queue entry is
//! gone; left alone it would poll as pending forever. The sweep
//! marks those records failed so clients get a definitive answer
//! and can resubmit. Runs once at boot, before the worker starts.

use vocalis_store::{DynJobStore, JobUpdate, StoreError};

/// Failure description written into interrupted records.
pub const INTERRUPTED_ERROR: &str = "Job interrupted by server restart; please resubmit";

/// Mark every non-terminal record as failed. Returns how many
/// records were swept.
pub async fn fail_interrupted_jobs(store: &DynJobStore) -> Result<usize, StoreError> {
    let records = store.list().await?;
    let mut swept = 0;

    for record in records {
        if record.status.is_terminal() {
            continue;
        }
        tracing::warn!(
            job_id = %record.job_id,
            status = %record.status,
            "Failing job interrupted by restart",
        );
        match store
            .update(
                &record.job_id,
                JobUpdate::failed(INTERRUPTED_ERROR, chrono::Utc::now()),
            )
            .await
        {
            Ok(_) => swept += 1,
            // One bad record must not block the rest of the sweep.
            Err(e) => {
                tracing::error!(job_id = %record.job_id, error = %e, "Failed to sweep interrupted job");
            }
        }
    }

    Ok(swept)
}
