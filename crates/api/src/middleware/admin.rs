//! Shared-key admin authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vocalis_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared admin credential.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Requires a valid `x-admin-key` header. Rejects with 401
/// otherwise.
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdminKey) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdminKey;

impl FromRequestParts<AppState> for RequireAdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-admin-key header".into()))
            })?;

        if provided != state.config.admin_key {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin key".into(),
            )));
        }

        Ok(RequireAdminKey)
    }
}
