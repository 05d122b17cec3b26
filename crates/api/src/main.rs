use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocalis_api::config::ServerConfig;
use vocalis_api::router::build_app_router;
use vocalis_api::state::AppState;
use vocalis_engine::{LazyEngine, SovitsEngine, SynthesisEngine};
use vocalis_store::{DynJobStore, FsJobStore, VoiceLibrary};
use vocalis_worker::{fail_interrupted_jobs, job_queue, SynthesisWorker};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocalis_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    for dir in [&config.voices_dir, &config.outputs_dir, &config.jobs_dir] {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create {}: {e}", dir.display()));
    }

    // --- Job store ---
    let store: DynJobStore = Arc::new(
        FsJobStore::open(&config.jobs_dir)
            .await
            .expect("Failed to open job store"),
    );
    tracing::info!(dir = %config.jobs_dir.display(), "Job store opened");

    // Jobs that were queued or processing when the previous process
    // died cannot resume; mark them failed so clients stop polling.
    let swept = fail_interrupted_jobs(&store)
        .await
        .expect("Failed to sweep interrupted jobs");
    if swept > 0 {
        tracing::warn!(count = swept, "Marked interrupted jobs as failed");
    }

    // --- Voice library ---
    let voices = VoiceLibrary::new(&config.voices_dir);

    // --- Job queue + synthesis worker ---
    let (queue, receiver) = job_queue();
    let sovits = config.sovits.clone();
    let engine = LazyEngine::deferred(move || {
        SovitsEngine::spawn(&sovits).map(|e| Box::new(e) as Box<dyn SynthesisEngine>)
    });

    let worker_cancel = CancellationToken::new();
    let worker = SynthesisWorker::new(Arc::clone(&store), voices.clone(), engine, receiver);
    let worker_handle = tokio::spawn(worker.run(worker_cancel.clone()));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        queue,
        voices,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    worker_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        worker_handle,
    )
    .await;
    tracing::info!("Synthesis worker stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
