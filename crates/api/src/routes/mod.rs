//! Route tree for the API.

pub mod admin;
pub mod health;
pub mod tts;
pub mod voices;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Job submission, polling, and queue status.
        .merge(tts::router())
        // Voice asset library.
        .nest("/voices", voices::router())
        // Admin routes (shared-key protected).
        .nest("/admin", admin::router())
}
