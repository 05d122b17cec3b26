//! Route definitions for job submission and polling.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tts;
use crate::state::AppState;

/// Routes mounted directly under `/api/v1`.
///
/// ```text
/// POST   /tts            -> submit_tts
/// GET    /tts/{job_id}   -> job_status
/// GET    /queue          -> queue_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tts", post(tts::submit_tts))
        .route("/tts/{job_id}", get(tts::job_status))
        .route("/queue", get(tts::queue_status))
}
