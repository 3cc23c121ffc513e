//! Internationalization (i18n) module for multi-language test suites.
//!
//! Everything a scenario needs to work with localized UI text lives here:
//! which languages exist, where their texts come from, and how a text is
//! resolved for the language a scenario runs in.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages, aliases and source names
//! - `language`: Normalized `Language` type backed by the registry
//! - `source`: Data source seam (`TextSource`) and schema validation of raw documents
//! - `catalog`: Per-language text cache that never fails outward
//! - `resolver`: Current-language state, lookup with fallback, scoped switching
//! - `completeness`: Missing-translation diff against a reference language
//! - `metrics`: Lookup hit/fallback/miss counters
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use polyglot_scenarios::i18n::{LanguageCatalog, LanguageResolver};
//!
//! let catalog = Arc::new(LanguageCatalog::from_dir("languages"));
//! let mut resolver = LanguageResolver::new(catalog, "english");
//!
//! resolver.set_language("vi");
//! let label = resolver.button_text("login", true);
//! let report = resolver.validate_completeness("en");
//! ```

mod catalog;
mod completeness;
mod language;
mod metrics;
mod registry;
mod resolver;
mod source;

pub use catalog::LanguageCatalog;
pub use completeness::{CompletenessReport, MissingByCategory};
pub use language::Language;
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolver::{
    is_missing_placeholder, missing_placeholder, CatalogSnapshot, LanguageInfo, LanguageResolver,
    LanguageScope, CATEGORY_BUTTON_TEXTS, CATEGORY_LABELS, CATEGORY_MESSAGES,
    CATEGORY_VALIDATION_MESSAGES,
};
pub use source::{
    empty_language_texts, parse_language_texts, JsonDirSource, LanguageTexts, MemorySource,
    SourceError, TextSource, DEFAULT_CATEGORIES,
};
