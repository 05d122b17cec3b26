//! Persistence layer: job records and voice assets.
//!
//! The job record store is a key-value abstraction ([`JobStore`])
//! with two implementations: [`FsJobStore`] (one JSON document per
//! job, durable across restarts) and [`MemoryJobStore`] (embedded
//! map, used in tests). The worker and API depend only on the
//! trait, so the backend can be swapped without touching either.

pub mod fs;
pub mod job_store;
pub mod memory;
pub mod models;
pub mod voices;

pub use fs::FsJobStore;
pub use job_store::{DynJobStore, JobStore, StoreError};
pub use memory::MemoryJobStore;
pub use models::{JobRecord, JobStatus, JobUpdate};
pub use voices::{LibraryStats, VoiceEntry, VoiceLibrary, VoiceMeta};
