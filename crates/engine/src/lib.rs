//! The external synthesis capability boundary.
//!
//! The worker talks to text-to-speech through [`SynthesisEngine`],
//! a narrow trait taking a reference sample, a resolved language
//! name, and text, and returning raw audio. [`SovitsEngine`] is the
//! production implementation (a GPT-SoVITS sidecar process holding
//! the loaded model); tests substitute their own.
//!
//! The engine holds exclusive in-memory model state and is not safe
//! for concurrent invocation, hence `&mut self` — exactly one
//! worker may own an engine.

pub mod audio;
pub mod sovits;

use std::path::PathBuf;

use async_trait::async_trait;

pub use audio::AudioClip;
pub use sovits::{SovitsConfig, SovitsEngine};

/// Errors from the synthesis capability.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine process could not be started.
    #[error("Failed to start synthesis engine: {0}")]
    Spawn(String),

    /// The engine broke its request/response protocol.
    #[error("Engine protocol error: {0}")]
    Protocol(String),

    /// The engine ran but synthesis itself failed.
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// I/O toward the engine or its artifacts failed.
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Produced audio could not be decoded.
    #[error("Audio decode error: {0}")]
    Audio(String),
}

/// One synthesis invocation.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Reference sample identifying the cloned voice.
    pub ref_wav_path: PathBuf,
    /// Full engine-side language name, already resolved from the
    /// client's short code.
    pub language: String,
    /// Text to speak.
    pub text: String,
}

/// Synchronous-from-the-caller's-perspective synthesis capability.
#[async_trait]
pub trait SynthesisEngine: Send {
    async fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip, EngineError>;
}

/// Factory producing an engine on first use.
pub type EngineFactory =
    Box<dyn FnOnce() -> Result<Box<dyn SynthesisEngine>, EngineError> + Send>;

/// Engine handle that defers construction until the first job.
///
/// Model loading is slow; deferring it keeps server startup fast
/// and means a misconfigured engine fails the first job instead of
/// the whole process. Owned by the worker, never shared.
pub struct LazyEngine {
    factory: Option<EngineFactory>,
    engine: Option<Box<dyn SynthesisEngine>>,
}

impl LazyEngine {
    /// Defer construction to `factory`, invoked on the first
    /// [`get`](Self::get).
    pub fn deferred(
        factory: impl FnOnce() -> Result<Box<dyn SynthesisEngine>, EngineError> + Send + 'static,
    ) -> Self {
        LazyEngine {
            factory: Some(Box::new(factory)),
            engine: None,
        }
    }

    /// Wrap an already-constructed engine (tests, mostly).
    pub fn ready(engine: Box<dyn SynthesisEngine>) -> Self {
        LazyEngine {
            factory: None,
            engine: Some(engine),
        }
    }

    /// Get the engine, constructing it on first call.
    ///
    /// A failed construction is not cached: the factory is gone, so
    /// every subsequent call reports the engine as unavailable and
    /// each affected job fails individually.
    pub fn get(&mut self) -> Result<&mut dyn SynthesisEngine, EngineError> {
        if self.engine.is_none() {
            let factory = self.factory.take().ok_or_else(|| {
                EngineError::Spawn("Synthesis engine unavailable (earlier startup failed)".into())
            })?;
            self.engine = Some(factory()?);
        }
        Ok(self
            .engine
            .as_mut()
            .expect("engine present after initialization")
            .as_mut())
    }
}
