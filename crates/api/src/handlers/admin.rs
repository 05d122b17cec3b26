//! Admin-only handlers, guarded by the shared `x-admin-key` header.

use axum::extract::State;
use axum::Json;
use vocalis_store::{LibraryStats, VoiceEntry};

use crate::error::AppResult;
use crate::middleware::admin::RequireAdminKey;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/voices
///
/// Every voice across all users.
pub async fn list_all_voices(
    _admin: RequireAdminKey,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<VoiceEntry>>>> {
    let voices = state.voices.list_all().await?;
    Ok(Json(DataResponse { data: voices }))
}

/// GET /api/v1/admin/stats
///
/// Aggregate voice library counts.
pub async fn stats(
    _admin: RequireAdminKey,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LibraryStats>>> {
    let stats = state.voices.stats().await?;
    Ok(Json(DataResponse { data: stats }))
}
