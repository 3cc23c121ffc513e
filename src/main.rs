//! Language report binary - validates translation completeness for a data directory
//!
//! Usage:
//!   cargo run --bin language-report                  # Completeness report as JSON
//!   cargo run --bin language-report -- --export      # Dump the whole catalog
//!   cargo run --bin language-report -- --export=vi   # Dump one language
//!
//! Optional environment variables:
//! - TEST_LANGUAGE (defaults to english)
//! - REFERENCE_LANGUAGE (defaults to en)
//! - LANGUAGE_DATA_DIR (defaults to languages)
//! - FAIL_ON_MISSING_TRANSLATIONS (defaults to false)

use anyhow::{bail, Context, Result};
use polyglot_scenarios::config::Config;
use polyglot_scenarios::i18n::{LanguageCatalog, LanguageResolver};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_scenarios=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!(
        "Loading language data from {}",
        config.language_data_dir.display()
    );

    let catalog = Arc::new(LanguageCatalog::from_dir(&config.language_data_dir));
    let resolver = LanguageResolver::new(catalog, &config.test_language);

    let export = std::env::args()
        .skip(1)
        .find_map(|arg| match arg.as_str() {
            "--export" => Some(None),
            other => other
                .strip_prefix("--export=")
                .map(|language| Some(language.to_string())),
        });

    if let Some(language) = export {
        let snapshot = resolver.export_snapshot(language.as_deref());
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{}", json);
        return Ok(());
    }

    let report = resolver.validate_completeness(&config.reference_language);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    if report.has_gaps() {
        info!(
            "{} translation keys missing against {}",
            report.total_missing(),
            report.reference
        );
        if config.fail_on_missing_translations {
            bail!("Missing translations found");
        }
    } else {
        info!("All languages have complete translations");
    }

    Ok(())
}
