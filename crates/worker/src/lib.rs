//! The asynchronous job subsystem's execution side: the FIFO job
//! queue channel, the single synthesis worker loop, and the startup
//! recovery sweep.

pub mod queue;
pub mod recovery;
pub mod worker;

pub use queue::{job_queue, JobQueue, JobReceiver, QueueClosed};
pub use recovery::fail_interrupted_jobs;
pub use worker::SynthesisWorker;
