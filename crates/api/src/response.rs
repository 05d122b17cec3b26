//! Shared response envelope types for API handlers.
//!
//! Collection and admin endpoints use a `{ "data": ... }` envelope.
//! The job submission/status endpoints return their payloads flat:
//! their shape is the polling contract clients depend on.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
