//! Print the project's language codes, one per line.
//!
//! Usage:
//!   cargo run --bin list-languages
//!
//! Required environment variables:
//! - POEDITOR_API_TOKEN
//! - POEDITOR_PROJECT_ID

use anyhow::{Context, Result};
use locale_sync::{config::Config, poeditor::PoEditorClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays a clean list
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("list_languages=info".parse()?),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let client = PoEditorClient::new(&config)?;

    let languages = client
        .list_languages()
        .await
        .context("Failed to list languages")?;

    for language in &languages {
        println!("{}", language);
    }

    info!("✓ {} languages", languages.len());
    Ok(())
}
