use std::path::PathBuf;

/// Errors produced while syncing translations from the provider.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or rejected credentials. Fatal before anything is written.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The language list could not be fetched or parsed.
    #[error("failed to fetch languages: {0}")]
    Fetch(String),

    #[error("failed to publish '{language}': {reason}")]
    Publish { language: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run deadline exceeded while publishing '{language}'")]
    Timeout { language: String },

    #[error("interrupted while publishing '{language}'")]
    Interrupted { language: String },

    /// Ctrl-C or the run deadline hit before the language list was known.
    #[error("run cancelled while listing languages: {0}")]
    Cancelled(String),
}

impl SyncError {
    pub fn publish(language: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::Publish {
            language: language.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error stops the whole run rather than a single language.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Config(_)
                | SyncError::Auth(_)
                | SyncError::Fetch(_)
                | SyncError::Cancelled(_)
        )
    }
}
