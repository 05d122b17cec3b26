use std::path::PathBuf;

use vocalis_engine::SovitsConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated
    /// `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum accepted upload size in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Shared admin credential checked against the `x-admin-key`
    /// header.
    pub admin_key: String,
    /// Root of the voice asset library.
    pub voices_dir: PathBuf,
    /// Root under which produced artifacts are written and served.
    pub outputs_dir: PathBuf,
    /// Root of the persisted job record store.
    pub jobs_dir: PathBuf,
    /// How to launch the GPT-SoVITS sidecar.
    pub sovits: SovitsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `HOST`                  | `0.0.0.0`                      |
    /// | `PORT`                  | `8001`                         |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                           |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                           |
    /// | `MAX_UPLOAD_MB`         | `50`                           |
    /// | `ADMIN_KEY`             | `supersecretadmin`             |
    /// | `VOICES_DIR`            | `voices`                       |
    /// | `OUTPUTS_DIR`           | `outputs`                      |
    /// | `JOBS_DIR`              | `jobs`                         |
    /// | `SOVITS_COMMAND`        | `python3 sovits_sidecar.py`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_mb: usize = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        let admin_key =
            std::env::var("ADMIN_KEY").unwrap_or_else(|_| "supersecretadmin".into());

        let voices_dir = PathBuf::from(std::env::var("VOICES_DIR").unwrap_or_else(|_| "voices".into()));
        let outputs_dir =
            PathBuf::from(std::env::var("OUTPUTS_DIR").unwrap_or_else(|_| "outputs".into()));
        let jobs_dir = PathBuf::from(std::env::var("JOBS_DIR").unwrap_or_else(|_| "jobs".into()));

        let sovits = sovits_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            admin_key,
            voices_dir,
            outputs_dir,
            jobs_dir,
            sovits,
        }
    }
}

/// Parse `SOVITS_COMMAND` (program followed by whitespace-separated
/// arguments) into a sidecar launch configuration.
fn sovits_from_env() -> SovitsConfig {
    let command =
        std::env::var("SOVITS_COMMAND").unwrap_or_else(|_| "python3 sovits_sidecar.py".into());
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().expect("SOVITS_COMMAND must not be empty");

    SovitsConfig {
        program,
        args: parts.collect(),
        env: Vec::new(),
    }
}
