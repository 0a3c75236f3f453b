use crate::config::Config;
use crate::error::SyncError;
use crate::language::LanguageCode;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Export format requested from POEditor: a flat key -> string JSON object.
pub const EXPORT_TYPE: &str = "key_value_json";

/// POEditor error code for an invalid API token.
const INVALID_TOKEN_CODE: &str = "4011";

/// Every POEditor response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: ResponseStatus,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    status: String,
    #[serde(default)]
    code: serde_json::Value,
    #[serde(default)]
    message: String,
}

impl ResponseStatus {
    // The API documents `code` as a string but some endpoints return a number.
    fn code(&self) -> String {
        match &self.code {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LanguagesResult {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
}

#[derive(Debug, Deserialize)]
struct ExportResult {
    url: Option<String>,
}

/// Why a provider call failed, before it is attributed to a run phase.
#[derive(Debug)]
enum CallError {
    Auth(String),
    Other(String),
}

impl CallError {
    /// Credential rejections stay `Auth` in every phase; anything else is
    /// attributed by `other`.
    fn into_sync_error(self, other: impl FnOnce(String) -> SyncError) -> SyncError {
        match self {
            CallError::Auth(msg) => SyncError::Auth(msg),
            CallError::Other(msg) => other(msg),
        }
    }
}

/// Client for the two POEditor endpoints the sync needs.
pub struct PoEditorClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    project_id: String,
}

impl PoEditorClient {
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("locale-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            project_id: config.project_id.clone(),
        })
    }

    /// List the language codes configured for the project.
    pub async fn list_languages(&self) -> Result<Vec<LanguageCode>, SyncError> {
        let result: LanguagesResult = self
            .post_form("languages/list", &[])
            .await
            .map_err(|e| e.into_sync_error(SyncError::Fetch))?;

        result
            .languages
            .iter()
            .map(|entry| LanguageCode::parse(&entry.code))
            .collect()
    }

    /// Ask POEditor to export one language and return the download URL.
    ///
    /// The URL is short-lived; callers download it right away and never
    /// keep it.
    pub async fn export_url(&self, language: &LanguageCode) -> Result<Url, SyncError> {
        let result: ExportResult = self
            .post_form(
                "projects/export",
                &[("language", language.as_str()), ("type", EXPORT_TYPE)],
            )
            .await
            .map_err(|e| e.into_sync_error(|msg| SyncError::publish(language.as_str(), msg)))?;

        let raw = result
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SyncError::publish(language.as_str(), "export response has no url"))?;

        let url = Url::parse(raw.trim()).map_err(|e| {
            SyncError::publish(
                language.as_str(),
                format!("invalid download url '{}': {}", raw, e),
            )
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::publish(
                language.as_str(),
                format!("unsupported download url scheme '{}'", url.scheme()),
            ));
        }

        Ok(url)
    }

    /// Download an exported file, returning its raw bytes untouched.
    pub async fn download(&self, language: &LanguageCode, url: Url) -> Result<Vec<u8>, SyncError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::publish(language.as_str(), format!("download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::publish(
                language.as_str(),
                format!("download failed (HTTP {}): {}", status, snippet(&body)),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            SyncError::publish(language.as_str(), format!("failed to read download: {}", e))
        })?;

        Ok(body.to_vec())
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, CallError> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let mut form: Vec<(&str, &str)> = vec![
            ("api_token", self.api_token.as_str()),
            ("id", self.project_id.as_str()),
        ];
        form.extend_from_slice(extra);

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| CallError::Other(format!("request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CallError::Other(format!("failed to read {} response: {}", endpoint, e)))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CallError::Auth(format!(
                "POEditor rejected credentials (HTTP {})",
                status
            )));
        }

        if !status.is_success() {
            return Err(CallError::Other(format!(
                "POEditor API error ({}): {}",
                status,
                snippet(&body)
            )));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            CallError::Other(format!("malformed {} response: {}", endpoint, e))
        })?;

        if envelope.response.status != "success" {
            let code = envelope.response.code();
            let msg = format!(
                "POEditor {} failed (code {}): {}",
                endpoint, code, envelope.response.message
            );
            return Err(if code == INVALID_TOKEN_CODE {
                CallError::Auth(msg)
            } else {
                CallError::Other(msg)
            });
        }

        envelope
            .result
            .ok_or_else(|| CallError::Other(format!("{} response has no result", endpoint)))
    }
}

/// Trim a response body for inclusion in an error message.
fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
