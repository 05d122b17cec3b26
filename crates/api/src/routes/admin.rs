//! Admin route definitions. Every handler here requires the
//! `x-admin-key` header via the [`RequireAdminKey`] extractor.
//!
//! [`RequireAdminKey`]: crate::middleware::admin::RequireAdminKey

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /voices -> list_all_voices
/// GET /stats  -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/voices", get(admin::list_all_voices))
        .route("/stats", get(admin::stats))
}
