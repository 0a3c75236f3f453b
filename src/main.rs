use anyhow::{Context, Result};
use chrono::Utc;
use locale_sync::config::Config;
use locale_sync::publisher;
use locale_sync::pull_request::PullRequestPlan;
use std::path::Path;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production/GitHub Actions)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_sync=info".parse()?),
        )
        .init();

    info!("Starting localization sync");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Syncing translations into {}", config.locale_dir.display());

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        warn!("Received Ctrl-C, cancelling the current language");
    };

    let report = publisher::sync(&config, shutdown)
        .await
        .context("Localization sync failed")?;

    let plan = PullRequestPlan::new(Utc::now().date_naive(), &report.changes);
    if plan.has_changes() {
        info!(
            "{} files changed, pull request branch: {}",
            plan.changed_files.len(),
            plan.branch
        );
    } else {
        info!("No translation files changed, nothing to propose");
    }

    if let Some(output) = std::env::var_os("GITHUB_OUTPUT") {
        plan.append_to(Path::new(&output))
            .context("Failed to write GITHUB_OUTPUT")?;
    }

    if !report.is_success() {
        for (language, e) in report.failures() {
            error!("✗ {}: {}", language, e);
        }
        for language in &report.aborted {
            error!("✗ {}: not attempted", language);
        }
        anyhow::bail!(
            "{} of {} languages were not published",
            report.failure_count() + report.aborted.len(),
            report.languages.len()
        );
    }

    info!("✓ All {} languages published", report.languages.len());
    Ok(())
}
