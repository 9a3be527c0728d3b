use std::path::PathBuf;

/// Client configuration, loaded from environment variables.
pub struct Config {
    /// Base URL of the school-management server.
    pub base_url: String,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Raw cookie string carrying the session and `csrftoken` cookies.
    pub cookie: String,
    /// Path to the SQLite preference database.
    pub db_path: PathBuf,
    /// Timeout in seconds applied to each HTTP request.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("rollcall");

        let db_path = std::env::var("ROLLCALL_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("prefs.db"));

        Self {
            base_url: std::env::var("ROLLCALL_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            camera_device: std::env::var("ROLLCALL_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            cookie: std::env::var("ROLLCALL_COOKIE").unwrap_or_default(),
            db_path,
            request_timeout_secs: env_u64("ROLLCALL_REQUEST_TIMEOUT_SECS", 10),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
