//! Language catalog: loads and caches per-language texts.
//!
//! The catalog never fails outward. A source that is missing or malformed
//! produces an entry with the default categories, all empty, and a warning.
//! Entries are shared as `Arc<LanguageTexts>` so several resolvers (one per
//! parallel worker) can read the same catalog.

use crate::i18n::source::{empty_language_texts, parse_language_texts, JsonDirSource, TextSource};
use crate::i18n::{Language, LanguageTexts};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{info, warn};

pub struct LanguageCatalog {
    source: Box<dyn TextSource>,
    entries: RwLock<HashMap<Language, Arc<LanguageTexts>>>,
    /// Serializes first loads so a source is fetched once per language
    load_guard: Mutex<()>,
    load_failures: AtomicUsize,
}

impl LanguageCatalog {
    /// Create an empty catalog backed by `source`.
    pub fn new(source: impl TextSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: RwLock::new(HashMap::new()),
            load_guard: Mutex::new(()),
            load_failures: AtomicUsize::new(0),
        }
    }

    /// Create a catalog reading `<dir>/<source_name>.json` files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(JsonDirSource::new(dir.as_ref()))
    }

    /// Load (or reload) the texts for `language`.
    ///
    /// Failures are logged and stored as an entry with empty default
    /// categories; reloading always replaces the previous entry.
    pub fn load(&self, language: Language) {
        let source_name = language.source_name();
        let fetched = self
            .source
            .fetch(source_name)
            .and_then(|document| parse_language_texts(source_name, &document));

        let texts = match fetched {
            Ok(texts) => {
                info!(
                    "Loaded language data for: {} ({} categories)",
                    language,
                    texts.len()
                );
                texts
            }
            Err(e) => {
                warn!("Could not load language data for {}: {}", language, e);
                self.load_failures.fetch_add(1, Ordering::Relaxed);
                empty_language_texts()
            }
        };

        self.write_entries().insert(language, Arc::new(texts));
    }

    /// Load `language` unless it is already present.
    pub fn ensure_loaded(&self, language: Language) {
        if self.is_loaded(language) {
            return;
        }

        let _guard = self.load_guard.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished the load while we waited
        if !self.is_loaded(language) {
            self.load(language);
        }
    }

    /// Look up one text. `None` means the key is absent (or the language is
    /// not loaded), which callers use to drive fallback.
    pub fn get(&self, language: Language, category: &str, key: &str) -> Option<String> {
        let entries = self.read_entries();
        entries
            .get(&language)?
            .get(&category.to_lowercase())?
            .get(key)
            .cloned()
    }

    /// Shared view of one language's texts, if loaded.
    pub fn texts(&self, language: Language) -> Option<Arc<LanguageTexts>> {
        self.read_entries().get(&language).cloned()
    }

    pub fn is_loaded(&self, language: Language) -> bool {
        self.read_entries().contains_key(&language)
    }

    /// Loaded languages, ordered by code.
    pub fn loaded_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.read_entries().keys().copied().collect();
        languages.sort();
        languages
    }

    /// Snapshot of every loaded entry, ordered by code.
    pub fn snapshot(&self) -> BTreeMap<Language, Arc<LanguageTexts>> {
        self.read_entries()
            .iter()
            .map(|(language, texts)| (*language, Arc::clone(texts)))
            .collect()
    }

    /// Number of loads that fell back to an empty entry.
    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    fn read_entries(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<Language, Arc<LanguageTexts>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<Language, Arc<LanguageTexts>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LanguageCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageCatalog")
            .field("loaded", &self.loaded_languages())
            .field("load_failures", &self.load_failures())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::source::{MemorySource, SourceError, DEFAULT_CATEGORIES};
    use serde_json::{json, Value};

    fn english_source() -> MemorySource {
        MemorySource::new().with_source(
            "english",
            json!({
                "messages": { "welcome": "Welcome" },
                "labels": { "email": "Email" }
            }),
        )
    }

    /// Counts fetches so tests can check the load-once guard.
    struct CountingSource {
        inner: MemorySource,
        fetches: Arc<AtomicUsize>,
    }

    impl TextSource for CountingSource {
        fn fetch(&self, source_name: &str) -> Result<Value, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(source_name)
        }
    }

    // ==================== load Tests ====================

    #[test]
    fn test_load_stores_texts() {
        let catalog = LanguageCatalog::new(english_source());
        catalog.load(Language::ENGLISH);

        assert!(catalog.is_loaded(Language::ENGLISH));
        assert_eq!(
            catalog.get(Language::ENGLISH, "messages", "welcome"),
            Some("Welcome".to_string())
        );
        assert_eq!(catalog.load_failures(), 0);
    }

    #[test]
    fn test_load_missing_source_stores_empty_defaults() {
        let catalog = LanguageCatalog::new(english_source());
        catalog.load(Language::VIETNAMESE);

        let texts = catalog.texts(Language::VIETNAMESE).expect("entry should exist");
        assert_eq!(texts.len(), DEFAULT_CATEGORIES.len());
        assert!(texts.values().all(|keys| keys.is_empty()));
        assert_eq!(catalog.load_failures(), 1);
    }

    #[test]
    fn test_load_malformed_source_stores_empty_defaults() {
        let source = MemorySource::new().with_source("english", json!("just a string"));
        let catalog = LanguageCatalog::new(source);
        catalog.load(Language::ENGLISH);

        let texts = catalog.texts(Language::ENGLISH).expect("entry should exist");
        assert!(texts.contains_key("validation_messages"));
        assert_eq!(catalog.load_failures(), 1);
    }

    #[test]
    fn test_reload_overwrites_entry() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let catalog = LanguageCatalog::new(CountingSource {
            inner: english_source(),
            fetches: Arc::clone(&fetches),
        });

        catalog.load(Language::ENGLISH);
        catalog.load(Language::ENGLISH);

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(catalog.loaded_languages(), vec![Language::ENGLISH]);
    }

    // ==================== ensure_loaded Tests ====================

    #[test]
    fn test_ensure_loaded_only_loads_once() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let catalog = LanguageCatalog::new(CountingSource {
            inner: english_source(),
            fetches: Arc::clone(&fetches),
        });

        catalog.ensure_loaded(Language::ENGLISH);
        catalog.ensure_loaded(Language::ENGLISH);

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ensure_loaded_concurrent_first_access() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let catalog = LanguageCatalog::new(CountingSource {
            inner: english_source(),
            fetches: Arc::clone(&fetches),
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    catalog.ensure_loaded(Language::ENGLISH);
                    catalog.ensure_loaded(Language::VIETNAMESE);
                });
            }
        });

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(
            catalog.loaded_languages(),
            vec![Language::ENGLISH, Language::VIETNAMESE]
        );
    }

    // ==================== get Tests ====================

    #[test]
    fn test_get_absent_cases() {
        let catalog = LanguageCatalog::new(english_source());
        catalog.load(Language::ENGLISH);

        assert_eq!(catalog.get(Language::ENGLISH, "messages", "nope"), None);
        assert_eq!(catalog.get(Language::ENGLISH, "unknown", "welcome"), None);
        assert_eq!(catalog.get(Language::VIETNAMESE, "messages", "welcome"), None);
    }

    #[test]
    fn test_get_category_is_case_insensitive() {
        let catalog = LanguageCatalog::new(english_source());
        catalog.load(Language::ENGLISH);

        assert_eq!(
            catalog.get(Language::ENGLISH, "Labels", "email"),
            Some("Email".to_string())
        );
    }

    #[test]
    fn test_from_dir_reads_json_files() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("vietnamese.json"),
            r#"{"messages": {"welcome": "Chào mừng"}}"#,
        )
        .expect("write");

        let catalog = LanguageCatalog::from_dir(dir.path());
        catalog.ensure_loaded(Language::VIETNAMESE);

        assert_eq!(
            catalog.get(Language::VIETNAMESE, "messages", "welcome"),
            Some("Chào mừng".to_string())
        );
    }
}
