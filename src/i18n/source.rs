//! Language data sources.
//!
//! A data source is a named document shaped as category -> (key -> text).
//! Sources are fetched as raw JSON and validated by `parse_language_texts`,
//! which keeps well-formed entries and skips everything else.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Category name -> (text key -> localized text), in source declaration order.
pub type LanguageTexts = IndexMap<String, IndexMap<String, String>>;

/// Categories every language entry carries, even when its source is unusable.
pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["messages", "button_texts", "labels", "validation_messages"];

/// Build an entry holding the default categories, all empty.
pub fn empty_language_texts() -> LanguageTexts {
    DEFAULT_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), IndexMap::new()))
        .collect()
}

/// Reasons a data source could not be turned into language texts.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("language source '{0}' not found")]
    NotFound(String),

    #[error("failed to read language source '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("language source '{name}' is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("language source '{0}' must be an object of categories")]
    Malformed(String),
}

/// Something that can fetch the raw document for a source name.
pub trait TextSource: Send + Sync {
    fn fetch(&self, source_name: &str) -> Result<Value, SourceError>;
}

/// Reads `<dir>/<source_name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, source_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", source_name))
    }
}

impl TextSource for JsonDirSource {
    fn fetch(&self, source_name: &str) -> Result<Value, SourceError> {
        let path = self.path_for(source_name);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(source_name.to_string())
            } else {
                SourceError::Io {
                    name: source_name.to_string(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&raw).map_err(|e| SourceError::Parse {
            name: source_name.to_string(),
            source: e,
        })
    }
}

/// In-memory sources, mostly for tests and embedded fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the document served for `source_name`.
    pub fn with_source(mut self, source_name: &str, document: Value) -> Self {
        self.documents.insert(source_name.to_string(), document);
        self
    }
}

impl TextSource for MemorySource {
    fn fetch(&self, source_name: &str) -> Result<Value, SourceError> {
        self.documents
            .get(source_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(source_name.to_string()))
    }
}

/// Validate a raw document into language texts.
///
/// The root must be an object. Top-level entries whose value is an object
/// become categories (names lower-cased); inside them only string values are
/// kept. Anything else is skipped. Categories and keys keep document order.
pub fn parse_language_texts(
    source_name: &str,
    document: &Value,
) -> Result<LanguageTexts, SourceError> {
    let root = document
        .as_object()
        .ok_or_else(|| SourceError::Malformed(source_name.to_string()))?;

    let mut texts = LanguageTexts::new();
    for (category, entries) in root {
        let Some(entries) = entries.as_object() else {
            debug!(
                "Skipping '{}' in source '{}': not a category object",
                category, source_name
            );
            continue;
        };

        let bucket = texts.entry(category.to_lowercase()).or_default();
        for (key, text) in entries {
            match text.as_str() {
                Some(text) => {
                    bucket.insert(key.clone(), text.to_string());
                }
                None => debug!(
                    "Skipping '{}.{}' in source '{}': text is not a string",
                    category, key, source_name
                ),
            }
        }
    }

    Ok(texts)
}
