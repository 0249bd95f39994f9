//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `NOKEYFINANCE_API_URL`: base URL of the OHLCV data service
//! - `NOKEYFINANCE_EXPORT_DIR`: directory that receives CSV and PNG exports
//! - `NOKEYFINANCE_TIMEOUT_SECS`: HTTP request timeout in seconds
//! - `NOKEYFINANCE_LOG_FILE`: file that receives tracing output

use std::path::PathBuf;
use std::time::Duration;

/// Default data service endpoint (the API's development server).
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default HTTP timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file, relative to the working directory.
const DEFAULT_LOG_FILE: &str = "nokeyfinance.log";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub export: ExportConfig,
    pub log_file: PathBuf,
}

/// Data service connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash; `/api/...` paths are appended.
    pub base_url: String,
    pub timeout: Duration,
}

/// Export destination settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

/// Loads the application configuration from environment variables.
///
/// The API URL defaults to `http://127.0.0.1:8000`, the timeout to 30
/// seconds, and the export directory to the platform data directory
/// (`exports/` under it), falling back to `./exports`.
///
/// # Errors
///
/// Returns [`NokeyError::Config`](crate::NokeyError::Config) if the
/// timeout is not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let base_url = non_empty_var("NOKEYFINANCE_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let timeout_secs = match non_empty_var("NOKEYFINANCE_TIMEOUT_SECS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(crate::NokeyError::Config(format!(
                    "NOKEYFINANCE_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                )));
            }
        },
        None => DEFAULT_TIMEOUT_SECS,
    };

    let dir = non_empty_var("NOKEYFINANCE_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(default_export_dir);

    let log_file = non_empty_var("NOKEYFINANCE_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(AppConfig {
        api: ApiConfig {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        },
        export: ExportConfig { dir },
        log_file,
    })
}

/// Platform data directory for exports, or `./exports` when none exists.
fn default_export_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "NoKeyFinance", "NoKeyFinance")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from("exports"))
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
