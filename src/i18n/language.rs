//! Language type: normalized, registry-backed language codes.
//!
//! A `Language` can only hold a code that exists in the registry. Lenient
//! construction (`normalize`) never fails and is what the resolver uses; strict
//! construction (`from_code`) rejects unknown input for callers that want to
//! validate configuration.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// Canonical language code (e.g., "en", "vi")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const VIETNAMESE: Language = Language { code: "vi" };

    /// Normalize a code, name or locale variant into a supported language.
    ///
    /// Unrecognized or empty input resolves to the canonical language, so this
    /// never fails.
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(Language::normalize(" Vietnamese ").code(), "vi");
    /// assert_eq!(Language::normalize("klingon").code(), "en");
    /// ```
    pub fn normalize(input: &str) -> Language {
        let registry = LanguageRegistry::get();
        match registry.resolve_alias(input) {
            Some(config) => Language { code: config.code },
            None => Language::canonical(),
        }
    }

    /// Create a Language from a code or alias, rejecting unknown input.
    ///
    /// # Returns
    /// * `Ok(Language)` if the input names a supported language
    /// * `Err` if it is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().resolve_alias(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the canonical language (the fallback for unrecognized input).
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// All supported languages in the registry's fixed order.
    pub fn supported() -> Vec<Language> {
        LanguageRegistry::get()
            .supported_codes()
            .into_iter()
            .map(|code| Language { code })
            .collect()
    }

    /// Get the canonical language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This cannot
    /// happen for a Language built through `normalize`, `from_code` or the
    /// constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Get the name of the data source this language is loaded from.
    pub fn source_name(&self) -> &'static str {
        self.config().source_name
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
