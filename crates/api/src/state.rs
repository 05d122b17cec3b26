use std::sync::Arc;

use vocalis_store::{DynJobStore, VoiceLibrary};
use vocalis_worker::JobQueue;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). Note what is absent: the synthesis engine. It is
/// owned exclusively by the worker task and never reachable from a
/// request handler.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Job record store (the source of truth for job status).
    pub store: DynJobStore,
    /// Producer half of the job queue.
    pub queue: JobQueue,
    /// Voice asset library.
    pub voices: VoiceLibrary,
}
