//! The sync run: enumerate languages, then export, download and store each one.
//!
//! Languages are processed one at a time. A failure for one language is
//! recorded and the run moves on. Enumeration failures stop the run before
//! any language; rejected credentials stop it wherever they occur.

use crate::config::Config;
use crate::error::SyncError;
use crate::language::LanguageCode;
use crate::poeditor::PoEditorClient;
use crate::store::{LocaleStore, WriteOutcome};
use std::collections::BTreeSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

/// Translation files modified during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
}

impl ChangeSet {
    pub fn insert(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Result of publishing a single language.
#[derive(Debug)]
pub struct LanguageResult {
    pub language: LanguageCode,
    pub path: PathBuf,
    pub outcome: Result<WriteOutcome, SyncError>,
}

/// Everything that happened during one run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Languages reported by the provider, in provider order.
    pub languages: Vec<LanguageCode>,
    /// One entry per attempted language.
    pub results: Vec<LanguageResult>,
    /// Languages never attempted because the run was cut short.
    pub aborted: Vec<LanguageCode>,
    pub interrupted: bool,
    pub changes: ChangeSet,
}

impl SyncReport {
    pub fn failures(&self) -> impl Iterator<Item = (&LanguageCode, &SyncError)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (&r.language, e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// True when every enumerated language was published.
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0 && self.aborted.is_empty() && !self.interrupted
    }
}

/// Export one language and store the downloaded file.
pub async fn publish_language(
    client: &PoEditorClient,
    store: &LocaleStore,
    language: &LanguageCode,
) -> Result<WriteOutcome, SyncError> {
    let url = client.export_url(language).await?;
    let content = client.download(language, url).await?;
    store.write(language, &content)
}

/// Run a full sync with the deadline taken from `config`.
pub async fn sync<S>(config: &Config, shutdown: S) -> Result<SyncReport, SyncError>
where
    S: Future<Output = ()>,
{
    let client = PoEditorClient::new(config)?;
    let store = LocaleStore::new(&config.locale_dir);
    let deadline = Instant::now() + config.run_timeout;

    sync_until(&client, &store, deadline, shutdown).await
}

/// Run a full sync that stops at `deadline` or when `shutdown` completes.
///
/// Files written before the run stops are left in place.
pub async fn sync_until<S>(
    client: &PoEditorClient,
    store: &LocaleStore,
    deadline: Instant,
    shutdown: S,
) -> Result<SyncReport, SyncError>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!("Fetching language list from POEditor");
    let languages = tokio::select! {
        biased;
        _ = &mut shutdown => {
            return Err(SyncError::Cancelled("interrupted".to_string()));
        }
        listed = timeout_at(deadline, client.list_languages()) => match listed {
            Ok(result) => result?,
            Err(_) => {
                return Err(SyncError::Cancelled("run deadline exceeded".to_string()));
            }
        },
    };

    info!("Found {} languages", languages.len());

    let mut report = SyncReport {
        languages: languages.clone(),
        ..SyncReport::default()
    };

    let total = languages.len();
    let mut stop = false;

    for (index, language) in languages.iter().enumerate() {
        let progress = index + 1;

        if stop || report.interrupted || Instant::now() >= deadline {
            report.aborted = languages[index..].to_vec();
            warn!(
                "Stopping early, {} languages not attempted",
                report.aborted.len()
            );
            break;
        }

        info!("[{}/{}] Exporting {}...", progress, total, language);
        let path = store.path_for(language);

        let outcome = tokio::select! {
            biased;
            _ = &mut shutdown => {
                report.interrupted = true;
                Err(SyncError::Interrupted { language: language.to_string() })
            }
            published = timeout_at(deadline, publish_language(client, store, language)) => {
                published.unwrap_or_else(|_| Err(SyncError::Timeout {
                    language: language.to_string(),
                }))
            }
        };

        match &outcome {
            Ok(written) => {
                if written.is_change() {
                    report.changes.insert(path.clone());
                }
                info!(
                    "[{}/{}] ✓ {} - {:?} ({})",
                    progress,
                    total,
                    language,
                    written,
                    path.display()
                );
            }
            Err(e) if e.is_fatal() => {
                error!("[{}/{}] ✗ {} - {}, aborting run", progress, total, language, e);
                stop = true;
            }
            Err(e) => {
                warn!("[{}/{}] ✗ {} - {}", progress, total, language, e);
            }
        }

        report.results.push(LanguageResult {
            language: language.clone(),
            path,
            outcome,
        });
    }

    info!(
        "Sync complete: {} successful, {} failed, {} aborted, {} files changed",
        report.success_count(),
        report.failure_count(),
        report.aborted.len(),
        report.changes.len()
    );

    Ok(report)
}
