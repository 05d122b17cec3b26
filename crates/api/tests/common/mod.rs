//! Shared test harness: builds the production router against
//! temp-dir-backed storage, optionally with a live worker task
//! driven by a stub engine.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use vocalis_api::config::ServerConfig;
use vocalis_api::router::build_app_router;
use vocalis_api::state::AppState;
use vocalis_engine::{
    AudioClip, EngineError, LazyEngine, SovitsConfig, SynthesisEngine, SynthesisRequest,
};
use vocalis_store::{DynJobStore, FsJobStore, VoiceLibrary};
use vocalis_worker::{job_queue, JobReceiver, SynthesisWorker};

/// Admin credential the test config is seeded with.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Engine stand-in. Produces a short fixed clip, except for text
/// containing `"fail"`, which reports a synthesis error.
struct StubEngine;

#[async_trait]
impl SynthesisEngine for StubEngine {
    async fn synthesize(&mut self, request: &SynthesisRequest) -> Result<AudioClip, EngineError> {
        if request.text.contains("fail") {
            return Err(EngineError::Synthesis("CUDA out of memory".into()));
        }
        Ok(AudioClip {
            sample_rate: 16_000,
            samples: vec![0.1; 1600],
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: DynJobStore,
    cancel: CancellationToken,
    // Held when no worker runs: dropping the receiver would close
    // the queue and make submissions 503.
    _receiver: Option<JobReceiver>,
    _root: tempfile::TempDir,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn test_config(root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 5,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 5 * 1024 * 1024,
        admin_key: ADMIN_KEY.into(),
        voices_dir: root.join("voices"),
        outputs_dir: root.join("outputs"),
        jobs_dir: root.join("jobs"),
        sovits: SovitsConfig {
            program: "false".into(),
            args: Vec::new(),
            env: Vec::new(),
        },
    }
}

/// Build the app without a worker: submitted jobs stay queued, which
/// is what API-surface tests want.
pub async fn spawn_app() -> TestApp {
    spawn_app_inner(false).await
}

/// Build the app with a running worker fed by [`StubEngine`], for
/// end-to-end submission/polling tests.
pub async fn spawn_app_with_worker() -> TestApp {
    spawn_app_inner(true).await
}

async fn spawn_app_inner(with_worker: bool) -> TestApp {
    let root = tempfile::tempdir().expect("tempdir");
    let config = test_config(root.path());

    for dir in [&config.voices_dir, &config.outputs_dir, &config.jobs_dir] {
        std::fs::create_dir_all(dir).expect("create test dirs");
    }

    let store: DynJobStore = Arc::new(
        FsJobStore::open(&config.jobs_dir)
            .await
            .expect("open job store"),
    );
    let voices = VoiceLibrary::new(&config.voices_dir);
    let (queue, receiver) = job_queue();

    let cancel = CancellationToken::new();
    let receiver = if with_worker {
        let worker = SynthesisWorker::new(
            Arc::clone(&store),
            voices.clone(),
            LazyEngine::ready(Box::new(StubEngine)),
            receiver,
        );
        tokio::spawn(worker.run(cancel.clone()));
        None
    } else {
        Some(receiver)
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::clone(&store),
        queue,
        voices,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        cancel,
        _receiver: receiver,
        _root: root,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, path: &str) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn get_with_admin_key(app: &TestApp, path: &str, key: &str) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .header("x-admin-key", key)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn post_json(app: &TestApp, path: &str, body: serde_json::Value) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn delete(app: &TestApp, path: &str) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

// ---------------------------------------------------------------------------
// Voice upload helper
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "vocalis-test-boundary";

fn multipart_body(user_id: &str, voice_name: &str, audio: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"audio\"; filename=\"ref.wav\"\r\n\
             Content-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(
        format!(
            "\r\n--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"user_id\"\r\n\r\n\
             {user_id}\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"voice_name\"\r\n\r\n\
             {voice_name}\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    body
}

/// Upload a reference sample through the multipart endpoint.
pub async fn upload_voice(app: &TestApp, user_id: &str, voice_name: &str) -> Response<Body> {
    upload_voice_bytes(app, user_id, voice_name, b"RIFFfakewav").await
}

pub async fn upload_voice_bytes(
    app: &TestApp,
    user_id: &str,
    voice_name: &str,
    audio: &[u8],
) -> Response<Body> {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/voices")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(user_id, voice_name, audio)))
                .expect("request"),
        )
        .await
        .expect("response")
}

// ---------------------------------------------------------------------------
// Polling helper
// ---------------------------------------------------------------------------

/// Poll a job's status endpoint until it reaches a terminal state,
/// returning the final status body. Panics after five seconds.
pub async fn wait_for_terminal(app: &TestApp, job_id: &str) -> serde_json::Value {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let response = get(app, &format!("/api/v1/tts/{job_id}")).await;
        let body = body_json(response).await;
        match body["status"].as_str() {
            Some("completed") | Some("failed") => return body,
            _ => {
                assert!(
                    tokio::time::Instant::now() < deadline,
                    "job {job_id} did not reach a terminal state: {body}"
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}
