//! Language registry: Single source of truth for all supported languages.
//!
//! The registry fixes the set of languages a test run can use, the order in
//! which they are scanned during fallback, the name of the data source each
//! one is loaded from, and the aliases callers may use to refer to them.
//! It is a process-wide singleton initialized once through `OnceLock`.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Canonical language code (e.g., "en", "vi")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Vietnamese")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Tiếng Việt")
    pub native_name: &'static str,

    /// Name of the data source holding this language's texts (e.g., "english")
    pub source_name: &'static str,

    /// Lower-case spellings that normalize to this language, besides `code`
    pub aliases: &'static [&'static str],

    /// Whether this is the canonical language (only one should be true)
    pub is_canonical: bool,
}

impl LanguageConfig {
    /// Check whether `input` names this language.
    ///
    /// `input` is expected to be trimmed and lower-cased already.
    fn answers_to(&self, input: &str) -> bool {
        self.code == input || self.aliases.contains(&input)
    }
}

/// Global language registry singleton.
///
/// Languages are kept in declaration order. That order is the fallback scan
/// order and the order reported by `supported_codes`, so it must not change
/// between runs.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its canonical code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Resolve a code, name or locale variant to a supported language.
    ///
    /// Matching trims surrounding whitespace and ignores case, so `" VN "`,
    /// `"Vietnamese"` and `"vi-VN"` all resolve to the same entry.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` for a recognized alias
    /// * `None` otherwise
    pub fn resolve_alias(&self, input: &str) -> Option<&LanguageConfig> {
        let normalized = input.trim().to_lowercase().replace('_', "-");
        if normalized.is_empty() {
            return None;
        }

        self.languages.iter().find(|lang| lang.answers_to(&normalized))
    }

    /// Get all languages, in declaration order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Codes of all languages, in declaration order.
    pub fn supported_codes(&self) -> Vec<&'static str> {
        self.languages.iter().map(|lang| lang.code).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// The canonical language is the one unrecognized input falls back to.
    ///
    /// # Panics
    /// Panics if no canonical language is found or if multiple canonical
    /// languages are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if a canonical language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// Default language configurations.
///
/// English is canonical; Vietnamese is the second supported language.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            source_name: "english",
            aliases: &["english", "eng", "en-us", "en-gb"],
            is_canonical: true,
        },
        LanguageConfig {
            code: "vi",
            name: "Vietnamese",
            native_name: "Tiếng Việt",
            source_name: "vietnamese",
            aliases: &["vietnamese", "vn", "vie", "vi-vn", "tiếng việt"],
            is_canonical: false,
        },
    ]
}
