//! Scenario lifecycle glue between a test runner and the language resolver.
//!
//! A runner calls the hooks in order: `before_all` once, then
//! `before_scenario` / `after_scenario` around every scenario, and
//! `after_all` at the end to get the run summary. Scenario tags of the form
//! `language.<alias>` pick the language a scenario runs in.

use crate::config::Config;
use crate::i18n::{CompletenessReport, Language, LanguageCatalog, LanguageResolver};
use crate::usage::UsageFlag;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

const LANGUAGE_TAG_PREFIX: &str = "language.";
const LANGUAGE_FEATURE_TAGS: [&str; 3] = ["multilang", "cross-language", "language-switching"];

fn strip_at(tag: &str) -> &str {
    tag.trim().trim_start_matches('@')
}

/// Language selected by a `language.<alias>` tag, if `tag` is one.
///
/// A bare `language.` yields an empty alias, which selects the canonical
/// language.
pub fn language_from_tag(tag: &str) -> Option<&str> {
    strip_at(tag).strip_prefix(LANGUAGE_TAG_PREFIX)
}

/// Whether `tag` marks a scenario as exercising language features.
pub fn is_language_tag(tag: &str) -> bool {
    let tag = strip_at(tag);
    tag.starts_with(LANGUAGE_TAG_PREFIX) || LANGUAGE_FEATURE_TAGS.contains(&tag)
}

/// End-of-run language report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub default_language: Language,
    pub supported_languages: Vec<Language>,
    pub language_features_used: bool,
    pub language_tags: BTreeSet<String>,
    /// Only computed when language features were used
    pub completeness: Option<CompletenessReport>,
    pub has_missing_translations: bool,
}

pub struct LanguageSession {
    resolver: LanguageResolver,
    reference_language: String,
    flag: Arc<dyn UsageFlag>,
    language_tags: BTreeSet<String>,
}

impl LanguageSession {
    /// Start a run: reset the usage flag and create the resolver with the
    /// configured run language.
    pub fn before_all(
        config: &Config,
        catalog: Arc<LanguageCatalog>,
        flag: Arc<dyn UsageFlag>,
    ) -> Self {
        flag.clear();
        let resolver = LanguageResolver::new(catalog, &config.test_language);

        info!(
            "Language session started: {} (code: {})",
            config.test_language,
            resolver.default_language()
        );

        Self {
            resolver,
            reference_language: config.reference_language.clone(),
            flag,
            language_tags: BTreeSet::new(),
        }
    }

    /// Start a run wired from `config` alone: texts come from
    /// `language_data_dir` and usage is recorded in the configured flag file.
    pub fn from_config(config: &Config) -> Self {
        let catalog = Arc::new(LanguageCatalog::from_dir(&config.language_data_dir));
        Self::before_all(config, catalog, Arc::new(config.usage_flag()))
    }

    /// Apply a scenario's tags: remember language-related ones and switch
    /// to the language named by the first `language.*` tag.
    pub fn before_scenario<S: AsRef<str>>(&mut self, tags: &[S]) {
        let mut language_related = false;
        for tag in tags {
            let tag: &str = tag.as_ref();
            if is_language_tag(tag) {
                self.language_tags.insert(strip_at(tag).to_string());
                language_related = true;
            }
        }

        if language_related {
            self.flag.mark();
        }

        if let Some(language) = tags.iter().find_map(|tag| language_from_tag(tag.as_ref())) {
            self.resolver.set_language(language);
        }
    }

    /// Return to the run's default language.
    pub fn after_scenario(&mut self) {
        let default = self.resolver.default_language();
        self.resolver.set_language(default.code());
    }

    /// Switch language in the middle of a scenario.
    pub fn switch_language(&mut self, language: &str) {
        self.resolver.set_language(language);
        self.flag.mark();
    }

    /// Resolve a text (with fallback) in the current language.
    pub fn text_in_current_language(&self, key: &str, category: &str) -> String {
        self.flag.mark();
        self.resolver.resolve_text(category, key, true)
    }

    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut LanguageResolver {
        &mut self.resolver
    }

    pub fn language_tags(&self) -> &BTreeSet<String> {
        &self.language_tags
    }

    /// Finish the run: validate completeness if language features were used,
    /// log the outcome and clear the usage flag.
    pub fn after_all(&self) -> RunSummary {
        let language_features_used = self.flag.is_marked();

        let completeness = language_features_used
            .then(|| self.resolver.validate_completeness(&self.reference_language));
        let has_missing_translations = completeness
            .as_ref()
            .is_some_and(CompletenessReport::has_gaps);

        let summary = RunSummary {
            default_language: self.resolver.default_language(),
            supported_languages: self.resolver.supported_languages(),
            language_features_used,
            language_tags: self.language_tags.clone(),
            completeness,
            has_missing_translations,
        };

        log_summary(&summary);
        self.flag.clear();
        summary
    }
}

fn log_summary(summary: &RunSummary) {
    info!(
        "Language summary: default {}, supported {:?}",
        summary.default_language,
        summary
            .supported_languages
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
    );

    if !summary.language_features_used {
        info!("No language features used in this run");
        return;
    }

    info!("Language features used: {:?}", summary.language_tags);
    match &summary.completeness {
        Some(report) if report.has_gaps() => warn!(
            "Missing translations found: {} keys missing against {}",
            report.total_missing(),
            report.reference
        ),
        _ => info!("All languages have complete translations"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemorySource;
    use crate::usage::MemoryUsageFlag;
    use serde_json::json;

    fn catalog(vietnamese_complete: bool) -> Arc<LanguageCatalog> {
        let vietnamese = if vietnamese_complete {
            json!({ "messages": { "welcome": "Chào mừng", "bye": "Tạm biệt" } })
        } else {
            json!({ "messages": { "bye": "Tạm biệt" } })
        };

        Arc::new(LanguageCatalog::new(
            MemorySource::new()
                .with_source(
                    "english",
                    json!({ "messages": { "welcome": "Welcome", "bye": "Goodbye" } }),
                )
                .with_source("vietnamese", vietnamese),
        ))
    }

    fn session(vietnamese_complete: bool) -> (LanguageSession, Arc<MemoryUsageFlag>) {
        let flag = Arc::new(MemoryUsageFlag::new());
        let session = LanguageSession::before_all(
            &Config::default(),
            catalog(vietnamese_complete),
            flag.clone(),
        );
        (session, flag)
    }

    // ==================== Tag Tests ====================

    #[test]
    fn test_language_from_tag() {
        assert_eq!(language_from_tag("language.vi"), Some("vi"));
        assert_eq!(language_from_tag("@language.vietnamese"), Some("vietnamese"));
        assert_eq!(language_from_tag("language."), Some(""));
        assert_eq!(language_from_tag("fixture.chrome"), None);
    }

    #[test]
    fn test_is_language_tag() {
        assert!(is_language_tag("language.en"));
        assert!(is_language_tag("@multilang"));
        assert!(is_language_tag("cross-language"));
        assert!(is_language_tag("language-switching"));
        assert!(!is_language_tag("fixture.firefox"));
        assert!(!is_language_tag("smoke"));
    }

    // ==================== Hook Tests ====================

    #[test]
    fn test_before_all_clears_flag_and_uses_config_language() {
        let flag = Arc::new(MemoryUsageFlag::new());
        flag.mark();
        let config = Config {
            test_language: "vietnamese".to_string(),
            ..Config::default()
        };

        let session = LanguageSession::before_all(&config, catalog(true), flag.clone());

        assert!(!flag.is_marked());
        assert_eq!(session.resolver().default_language(), Language::VIETNAMESE);
    }

    #[test]
    fn test_before_scenario_switches_on_language_tag() {
        let (mut session, flag) = session(true);

        session.before_scenario(&["fixture.chrome", "@language.vi", "language.en"]);

        assert_eq!(session.resolver().current_language(), Language::VIETNAMESE);
        assert!(flag.is_marked());
        assert_eq!(
            session.language_tags().iter().cloned().collect::<Vec<_>>(),
            vec!["language.en".to_string(), "language.vi".to_string()]
        );
    }

    #[test]
    fn test_before_scenario_without_language_tags() {
        let (mut session, flag) = session(true);

        session.before_scenario(&["fixture.chrome", "smoke"]);

        assert_eq!(session.resolver().current_language(), Language::ENGLISH);
        assert!(!flag.is_marked());
        assert!(session.language_tags().is_empty());
    }

    #[test]
    fn test_bare_language_tag_selects_canonical_language() {
        let flag = Arc::new(MemoryUsageFlag::new());
        let config = Config {
            test_language: "vi".to_string(),
            ..Config::default()
        };
        let mut session = LanguageSession::before_all(&config, catalog(true), flag);

        session.before_scenario(&["@language."]);

        assert_eq!(session.resolver().current_language(), Language::ENGLISH);
    }

    #[test]
    fn test_from_config_uses_data_dir_and_flag_file() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("vietnamese.json"),
            r#"{"messages": {"welcome": "Chào mừng"}}"#,
        )
        .expect("Failed to write source");
        let flag_path = dir.path().join("language.flag");
        std::fs::write(&flag_path, "True").expect("Failed to write flag");

        let config = Config {
            test_language: "vietnamese".to_string(),
            language_data_dir: dir.path().to_path_buf(),
            language_flag_file: Some(flag_path.clone()),
            ..Config::default()
        };
        let mut session = LanguageSession::from_config(&config);

        assert!(!flag_path.exists());
        assert_eq!(session.text_in_current_language("welcome", "messages"), "Chào mừng");
        assert!(flag_path.exists());

        session.before_scenario(&["@multilang"]);
        assert!(config.usage_flag().is_marked());
    }

    #[test]
    fn test_after_scenario_resets_to_run_default() {
        let (mut session, _flag) = session(true);
        session.before_scenario(&["language.vi"]);

        session.after_scenario();

        assert_eq!(session.resolver().current_language(), Language::ENGLISH);
    }

    #[test]
    fn test_text_in_current_language_marks_flag() {
        let (mut session, flag) = session(true);
        session.switch_language("vi");
        flag.clear();

        assert_eq!(session.text_in_current_language("welcome", "messages"), "Chào mừng");
        assert!(flag.is_marked());
    }

    // ==================== Summary Tests ====================

    #[test]
    fn test_after_all_without_language_features() {
        let (session, _flag) = session(false);

        let summary = session.after_all();

        assert!(!summary.language_features_used);
        assert!(summary.completeness.is_none());
        assert!(!summary.has_missing_translations);
    }

    #[test]
    fn test_after_all_reports_missing_translations() {
        let (mut session, flag) = session(false);
        session.before_scenario(&["multilang"]);

        let summary = session.after_all();

        assert!(summary.language_features_used);
        assert!(summary.has_missing_translations);
        let report = summary.completeness.expect("report should be computed");
        assert_eq!(
            report.missing_for(Language::VIETNAMESE)["messages"],
            vec!["welcome".to_string()]
        );
        assert!(!flag.is_marked());
    }

    #[test]
    fn test_after_all_complete_translations() {
        let (mut session, _flag) = session(true);
        session.switch_language("vi");

        let summary = session.after_all();

        assert!(summary.language_features_used);
        assert!(!summary.has_missing_translations);
        assert_eq!(
            summary.supported_languages,
            vec![Language::ENGLISH, Language::VIETNAMESE]
        );
    }
}
