use crate::error::SyncError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.poeditor.com/v2";

#[derive(Clone)]
pub struct Config {
    // POEditor
    pub api_token: String,
    pub project_id: String,
    pub api_url: String,

    // Output
    pub locale_dir: PathBuf,

    // Limits
    pub run_timeout: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable lookup.
    ///
    /// Credentials must be present and non-empty; anything else falls back
    /// to its default when missing or unparseable.
    pub fn from_vars<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, SyncError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SyncError::Auth(format!("{} not set", key)))
        };

        let seconds = |key: &str, default: u64| -> Duration {
            let secs = lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(default);
            Duration::from_secs(secs)
        };

        let api_url = lookup("POEDITOR_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(SyncError::Config(format!(
                "POEDITOR_API_URL must be an http(s) URL, got '{}'",
                api_url
            )));
        }

        Ok(Self {
            api_token: required("POEDITOR_API_TOKEN")?,
            project_id: required("POEDITOR_PROJECT_ID")?,
            api_url,

            locale_dir: lookup("LOCALE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("locale")),

            run_timeout: seconds("SYNC_TIMEOUT_SECS", 300),
            http_timeout: seconds("HTTP_TIMEOUT_SECS", 30),
        })
    }
}

// Both credentials are secrets and must never reach logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("project_id", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("locale_dir", &self.locale_dir)
            .field("run_timeout", &self.run_timeout)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
