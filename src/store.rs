use crate::error::SyncError;
use crate::language::LanguageCode;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// What happened to a translation file when it was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    /// Content on disk already matched; the file was not touched.
    Unchanged,
}

impl WriteOutcome {
    pub fn is_change(self) -> bool {
        !matches!(self, WriteOutcome::Unchanged)
    }
}

/// Directory holding one `<code>.json` file per language.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
}

impl LocaleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, language: &LanguageCode) -> PathBuf {
        language.path_in(&self.dir)
    }

    /// Store `content` verbatim as the translation file for `language`.
    ///
    /// The file is only rewritten when its bytes differ, so an unchanged
    /// export never shows up in the working-tree diff.
    pub fn write(&self, language: &LanguageCode, content: &[u8]) -> Result<WriteOutcome, SyncError> {
        let path = self.path_for(language);

        let outcome = match fs::read(&path) {
            Ok(existing) if existing == content => return Ok(WriteOutcome::Unchanged),
            Ok(_) => WriteOutcome::Updated,
            Err(e) if e.kind() == ErrorKind::NotFound => WriteOutcome::Created,
            Err(source) => return Err(SyncError::Persistence { path, source }),
        };

        fs::create_dir_all(&self.dir).map_err(|source| SyncError::Persistence {
            path: self.dir.clone(),
            source,
        })?;

        fs::write(&path, content).map_err(|source| SyncError::Persistence {
            path: path.clone(),
            source,
        })?;

        Ok(outcome)
    }
}
