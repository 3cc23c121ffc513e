//! Translation completeness validation.
//!
//! Diffs every supported language against a reference language and lists,
//! per category, the reference keys the language lacks.

use crate::i18n::{Language, LanguageCatalog};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Category -> missing keys, both in the reference source's order.
pub type MissingByCategory = IndexMap<String, Vec<String>>;

/// Result of comparing languages against a reference language.
///
/// Every compared language has an entry; categories with no gaps are
/// omitted, so a complete language maps to an empty set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub reference: Language,
    pub missing: BTreeMap<Language, MissingByCategory>,
}

impl CompletenessReport {
    /// Compare each of `languages` (except `reference`) with `reference`.
    ///
    /// Reads the catalog only; languages that were never loaded are treated
    /// as having no texts.
    pub fn compute(catalog: &LanguageCatalog, reference: Language, languages: &[Language]) -> Self {
        let reference_texts = catalog.texts(reference).unwrap_or_default();

        let mut missing = BTreeMap::new();
        for &language in languages.iter().filter(|&&language| language != reference) {
            let target_texts = catalog.texts(language).unwrap_or_default();

            let mut gaps = MissingByCategory::new();
            for (category, reference_keys) in reference_texts.iter() {
                let target_keys = target_texts.get(category);
                let absent: Vec<String> = reference_keys
                    .keys()
                    .filter(|key| target_keys.map_or(true, |keys| !keys.contains_key(*key)))
                    .cloned()
                    .collect();
                if !absent.is_empty() {
                    gaps.insert(category.clone(), absent);
                }
            }

            missing.insert(language, gaps);
        }

        Self { reference, missing }
    }

    /// Check if any compared language is missing at least one key.
    pub fn has_gaps(&self) -> bool {
        self.missing.values().any(|categories| !categories.is_empty())
    }

    /// Total number of missing keys across all languages and categories.
    pub fn total_missing(&self) -> usize {
        self.missing
            .values()
            .flat_map(|categories| categories.values())
            .map(Vec::len)
            .sum()
    }

    /// Missing keys for one language (empty if it is complete or not compared).
    pub fn missing_for(&self, language: Language) -> MissingByCategory {
        self.missing.get(&language).cloned().unwrap_or_default()
    }
}
