//! Language resolver: the single point of text lookup used by test steps.
//!
//! The resolver tracks the current language, looks texts up with optional
//! cross-language fallback, and exposes validation and reporting helpers.
//! Missing texts and unknown languages are ordinary data here: lookups
//! return a `[Missing: key]` placeholder and unknown languages normalize to
//! the canonical one.

use crate::i18n::{
    CompletenessReport, Language, LanguageCatalog, LanguageTexts, LookupMetrics, MetricsReport,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{info, warn};

pub const CATEGORY_MESSAGES: &str = "messages";
pub const CATEGORY_BUTTON_TEXTS: &str = "button_texts";
pub const CATEGORY_LABELS: &str = "labels";
pub const CATEGORY_VALIDATION_MESSAGES: &str = "validation_messages";

const MISSING_PREFIX: &str = "[Missing: ";

/// Placeholder returned when no language has a text for `key`.
pub fn missing_placeholder(key: &str) -> String {
    format!("{}{}]", MISSING_PREFIX, key)
}

/// Check whether `text` is a missing-text placeholder.
pub fn is_missing_placeholder(text: &str) -> bool {
    text.starts_with(MISSING_PREFIX) && text.ends_with(']')
}

/// Summary of the current language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: Language,
    pub name: &'static str,
    pub available_categories: Vec<String>,
}

/// Diagnostic dump of catalog contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CatalogSnapshot {
    /// Every loaded language plus resolver state
    Full {
        current_language: Language,
        supported_languages: Vec<Language>,
        all_data: BTreeMap<Language, LanguageTexts>,
    },
    /// A single language's texts
    Single {
        language: Language,
        data: LanguageTexts,
    },
}

pub struct LanguageResolver {
    catalog: Arc<LanguageCatalog>,
    current: Language,
    default: Language,
    metrics: LookupMetrics,
}

impl LanguageResolver {
    /// Create a resolver whose current and default language is
    /// `default_language` (normalized), eagerly loading every supported
    /// language so fallback never hits a cold catalog mid-scenario.
    pub fn new(catalog: Arc<LanguageCatalog>, default_language: &str) -> Self {
        let default = Language::normalize(default_language);

        for language in Language::supported() {
            catalog.ensure_loaded(language);
        }

        info!(
            "LanguageResolver initialized with default language: {}",
            default
        );

        Self {
            catalog,
            current: default,
            default,
            metrics: LookupMetrics::new(),
        }
    }

    // ==================== Language State ====================

    /// Switch the current language. Unrecognized input selects the
    /// canonical language.
    pub fn set_language(&mut self, language: &str) {
        let normalized = Language::normalize(language);
        self.catalog.ensure_loaded(normalized);
        self.current = normalized;
        info!("Language switched to: {}", normalized);
    }

    pub fn current_language(&self) -> Language {
        self.current
    }

    pub fn default_language(&self) -> Language {
        self.default
    }

    /// Supported languages in fixed fallback order.
    pub fn supported_languages(&self) -> Vec<Language> {
        Language::supported()
    }

    pub fn catalog(&self) -> &Arc<LanguageCatalog> {
        &self.catalog
    }

    pub fn current_language_info(&self) -> LanguageInfo {
        let available_categories = self
            .catalog
            .texts(self.current)
            .map(|texts| texts.keys().cloned().collect())
            .unwrap_or_default();

        LanguageInfo {
            code: self.current,
            name: self.current.native_name(),
            available_categories,
        }
    }

    // ==================== Lookup ====================

    /// Look up `key` in `category` for the current language.
    ///
    /// With `allow_fallback`, other supported languages are scanned in the
    /// registry's fixed order and the first hit is returned. Otherwise, or if
    /// no language has the key, the result is `[Missing: key]`.
    pub fn resolve_text(&self, category: &str, key: &str, allow_fallback: bool) -> String {
        if let Some(text) = self.catalog.get(self.current, category, key) {
            self.metrics.record_hit();
            return text;
        }

        if allow_fallback {
            let fallback = Language::supported()
                .into_iter()
                .filter(|&language| language != self.current)
                .find_map(|language| {
                    self.catalog
                        .get(language, category, key)
                        .map(|text| (language, text))
                });

            if let Some((source_language, text)) = fallback {
                warn!(
                    "Using fallback text for {} from {} (current language: {})",
                    key, source_language, self.current
                );
                self.metrics.record_fallback();
                return text;
            }
        }

        self.metrics.record_miss();
        missing_placeholder(key)
    }

    pub fn message(&self, key: &str, allow_fallback: bool) -> String {
        self.resolve_text(CATEGORY_MESSAGES, key, allow_fallback)
    }

    pub fn button_text(&self, key: &str, allow_fallback: bool) -> String {
        self.resolve_text(CATEGORY_BUTTON_TEXTS, key, allow_fallback)
    }

    pub fn label_text(&self, key: &str, allow_fallback: bool) -> String {
        self.resolve_text(CATEGORY_LABELS, key, allow_fallback)
    }

    pub fn validation_message(&self, key: &str, allow_fallback: bool) -> String {
        self.resolve_text(CATEGORY_VALIDATION_MESSAGES, key, allow_fallback)
    }

    /// Resolve several keys of one category (with fallback). Misses become
    /// placeholders; the batch never stops early.
    pub fn bulk_resolve<S: AsRef<str>>(
        &self,
        keys: &[S],
        category: &str,
    ) -> BTreeMap<String, String> {
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), self.resolve_text(category, key, true))
            })
            .collect()
    }

    /// Map an observed UI string back to its key in the current language.
    ///
    /// Comparison ignores case. Categories and keys are searched in source
    /// order and the first matching key wins.
    pub fn reverse_lookup(&self, text: &str, category: Option<&str>) -> Option<String> {
        let texts = self.catalog.texts(self.current)?;
        let needle = text.to_lowercase();

        let find_in = |keys: &IndexMap<String, String>| {
            keys.iter()
                .find(|(_, value)| value.to_lowercase() == needle)
                .map(|(key, _)| key.clone())
        };

        match category {
            Some(category) => texts.get(&category.to_lowercase()).and_then(find_in),
            None => texts.values().find_map(find_in),
        }
    }

    // ==================== Validation & Reporting ====================

    /// Diff every supported language against `reference_language`.
    ///
    /// Pure: neither the catalog nor the current language changes.
    pub fn validate_completeness(&self, reference_language: &str) -> CompletenessReport {
        let reference = Language::normalize(reference_language);
        CompletenessReport::compute(&self.catalog, reference, &self.supported_languages())
    }

    /// All texts of one language (normalized), empty if it was never loaded.
    pub fn texts_for_language(&self, language: &str) -> LanguageTexts {
        let language = Language::normalize(language);
        self.catalog
            .texts(language)
            .map(|texts| texts.as_ref().clone())
            .unwrap_or_default()
    }

    /// Export either the whole catalog with resolver state, or one language.
    pub fn export_snapshot(&self, language: Option<&str>) -> CatalogSnapshot {
        match language {
            Some(language) => CatalogSnapshot::Single {
                language: Language::normalize(language),
                data: self.texts_for_language(language),
            },
            None => CatalogSnapshot::Full {
                current_language: self.current,
                supported_languages: self.supported_languages(),
                all_data: self
                    .catalog
                    .snapshot()
                    .into_iter()
                    .map(|(language, texts)| (language, texts.as_ref().clone()))
                    .collect(),
            },
        }
    }

    /// Keys available in `language` (or the current language), limited to
    /// `category` when given, otherwise the union over all categories.
    pub fn available_keys(
        &self,
        category: Option<&str>,
        language: Option<&str>,
    ) -> BTreeSet<String> {
        let language = language.map_or(self.current, Language::normalize);
        let Some(texts) = self.catalog.texts(language) else {
            return BTreeSet::new();
        };

        match category {
            Some(category) => texts
                .get(&category.to_lowercase())
                .map(|keys| keys.keys().cloned().collect())
                .unwrap_or_default(),
            None => texts
                .values()
                .flat_map(|keys| keys.keys().cloned())
                .collect(),
        }
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    // ==================== Scoped Switching ====================

    /// Switch to `language` until the returned guard is dropped.
    ///
    /// The guard derefs to the resolver, and dropping it restores the
    /// previous current language on every exit path, including `?` returns
    /// and panics. The default language is never touched.
    pub fn scoped_language(&mut self, language: &str) -> LanguageScope<'_> {
        let previous = self.current;
        self.set_language(language);
        LanguageScope {
            resolver: self,
            previous,
        }
    }

    /// Run `work` with `language` as the current language.
    pub fn with_language<R>(&mut self, language: &str, work: impl FnOnce(&mut Self) -> R) -> R {
        let mut scope = self.scoped_language(language);
        work(&mut *scope)
    }
}

impl std::fmt::Debug for LanguageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageResolver")
            .field("current", &self.current)
            .field("default", &self.default)
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Guard returned by [`LanguageResolver::scoped_language`].
pub struct LanguageScope<'a> {
    resolver: &'a mut LanguageResolver,
    previous: Language,
}

impl Deref for LanguageScope<'_> {
    type Target = LanguageResolver;

    fn deref(&self) -> &Self::Target {
        &*self.resolver
    }
}

impl DerefMut for LanguageScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.resolver
    }
}

impl Drop for LanguageScope<'_> {
    fn drop(&mut self) {
        self.resolver.current = self.previous;
    }
}
