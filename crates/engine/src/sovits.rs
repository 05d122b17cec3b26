//! GPT-SoVITS sidecar engine.
//!
//! The model runs in a separate long-lived process (spawned once;
//! weights load at startup) speaking a line-delimited JSON protocol
//! on stdin/stdout:
//!
//! ```text
//! → {"ref_wav_path":"...","language":"English","text":"..."}
//! ← {"status":"ok","wav_path":"/tmp/....wav"}
//! ← {"status":"error","message":"..."}
//! ```
//!
//! On success the sidecar has written a WAV to a scratch path; we
//! decode it into an [`AudioClip`] and remove the scratch file.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::{audio, AudioClip, EngineError, SynthesisEngine, SynthesisRequest};

/// How to launch the sidecar process.
#[derive(Debug, Clone)]
pub struct SovitsConfig {
    /// Program to execute (e.g. `python`).
    pub program: String,
    /// Arguments (e.g. the sidecar script path and model paths).
    pub args: Vec<String>,
    /// Extra environment variables (e.g. `CUDA_VISIBLE_DEVICES`).
    pub env: Vec<(String, String)>,
}

#[derive(Serialize)]
struct SidecarRequest<'a> {
    ref_wav_path: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SidecarResponse {
    status: String,
    wav_path: Option<String>,
    message: Option<String>,
}

/// A running GPT-SoVITS sidecar. Exactly one request is in flight
/// at a time; the caller holds `&mut self` for the full duration.
pub struct SovitsEngine {
    // Kept alive for the lifetime of the engine; kill_on_drop tears
    // the process down when the worker shuts down.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl SovitsEngine {
    /// Spawn the sidecar process. Model loading happens inside the
    /// sidecar; the first `synthesize` call waits for it.
    pub fn spawn(config: &SovitsConfig) -> Result<Self, EngineError> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|e| {
            EngineError::Spawn(format!("Failed to spawn '{}': {e}", config.program))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Sidecar stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Sidecar stdout not captured".into()))?;

        tracing::info!(program = %config.program, "Synthesis sidecar spawned");

        Ok(SovitsEngine {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    async fn exchange(&mut self, request: &SynthesisRequest) -> Result<SidecarResponse, EngineError> {
        let payload = serde_json::to_string(&SidecarRequest {
            ref_wav_path: &request.ref_wav_path.to_string_lossy(),
            language: &request.language,
            text: &request.text,
        })
        .map_err(|e| EngineError::Protocol(e.to_string()))?;

        self.stdin.write_all(payload.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;

        let mut line = String::new();
        let n = self.stdout.read_line(&mut line).await?;
        if n == 0 {
            return Err(EngineError::Protocol(
                "Sidecar closed its output stream".into(),
            ));
        }

        serde_json::from_str(line.trim())
            .map_err(|e| EngineError::Protocol(format!("Bad sidecar response: {e}")))
    }
}

#[async_trait]
impl SynthesisEngine for SovitsEngine {
    async fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip, EngineError> {
        let response = self.exchange(request).await?;

        match response.status.as_str() {
            "ok" => {
                let wav_path = response.wav_path.ok_or_else(|| {
                    EngineError::Protocol("ok response missing wav_path".into())
                })?;
                let clip = audio::read_wav(&wav_path)?;
                // Scratch file; the worker owns the real artifact.
                if let Err(e) = std::fs::remove_file(&wav_path) {
                    tracing::debug!(path = %wav_path, error = %e, "Could not remove scratch WAV");
                }
                Ok(clip)
            }
            "error" => Err(EngineError::Synthesis(
                response
                    .message
                    .unwrap_or_else(|| "Sidecar reported an unspecified error".into()),
            )),
            other => Err(EngineError::Protocol(format!(
                "Unknown sidecar status: {other}"
            ))),
        }
    }
}
