//! Route definitions for the voice asset library.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::voices;
use crate::state::AppState;

/// Routes mounted at `/voices`.
///
/// ```text
/// POST   /                         -> create_voice (multipart)
/// GET    /{user_id}                -> list_voices
/// DELETE /{user_id}/{voice_id}     -> delete_voice
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(voices::create_voice))
        .route("/{user_id}", get(voices::list_voices))
        .route("/{user_id}/{voice_id}", delete(voices::delete_voice))
}
