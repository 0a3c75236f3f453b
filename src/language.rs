//! Language codes as reported by the provider.
//!
//! A `LanguageCode` is validated once, when it enters the crate, so that the
//! file name derived from it is always a single safe path component.

use crate::error::SyncError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Longest code accepted from the provider.
const MAX_CODE_LEN: usize = 32;

/// A validated locale identifier (e.g. "en", "pt-br", "zh_TW").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate a raw code.
    ///
    /// Accepts ASCII alphanumerics, `-` and `_` only. The code is kept
    /// exactly as given (no case folding), because it is sent back to the
    /// provider verbatim.
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        if raw.is_empty() {
            return Err(SyncError::Fetch("empty language code".to_string()));
        }
        if raw.len() > MAX_CODE_LEN {
            return Err(SyncError::Fetch(format!(
                "language code too long ({} bytes): '{}'",
                raw.len(),
                raw
            )));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SyncError::Fetch(format!(
                "invalid language code: '{}'",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for this language's translations, e.g. `en.json`.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Path of the translation file inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
