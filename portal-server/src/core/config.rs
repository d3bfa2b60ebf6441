//! Server configuration
//!
//! All settings come from environment variables (a `.env` file is
//! honored in development):
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/threadpoint | Working directory (logs, db, uploads) |
//! | DATABASE_PATH | <WORK_DIR>/portal.db | SQLite database file |
//! | UPLOAD_DIR | <WORK_DIR>/uploads | Stored upload blobs |
//! | MAX_UPLOAD_BYTES | 26214400 | Upload size cap (25 MiB) |
//! | ENVIRONMENT | development | development / staging / production |

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for logs and data files
    pub work_dir: String,
    /// SQLite database file path
    pub database_path: String,
    /// Directory holding stored upload blobs
    pub upload_dir: String,
    /// Upload size cap in bytes
    pub max_upload_bytes: i64,
    /// development | staging | production
    pub environment: String,
}

const DEFAULT_MAX_UPLOAD_BYTES: i64 = 25 * 1024 * 1024;

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/threadpoint".into());
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| format!("{work_dir}/portal.db")),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| format!("{work_dir}/uploads")),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            work_dir,
        }
    }

    /// Configuration rooted at an explicit directory, used by tests.
    pub fn with_work_dir(dir: &str) -> Self {
        Self {
            work_dir: dir.to_string(),
            database_path: format!("{dir}/portal.db"),
            upload_dir: format!("{dir}/uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            environment: "test".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
