use crate::usage::FileUsageFlag;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Languages
    pub test_language: String,
    pub reference_language: String,

    // Language data
    pub language_data_dir: PathBuf,

    // Run bookkeeping
    pub language_flag_file: Option<PathBuf>,
    pub fail_on_missing_translations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_language: "english".to_string(),
            reference_language: "en".to_string(),
            language_data_dir: PathBuf::from("languages"),
            language_flag_file: None,
            fail_on_missing_translations: false,
        }
    }
}

impl Config {
    /// Read configuration from the environment. Every setting has a default,
    /// and unparsable values fall back to it.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            test_language: std::env::var("TEST_LANGUAGE").unwrap_or(defaults.test_language),
            reference_language: std::env::var("REFERENCE_LANGUAGE")
                .unwrap_or(defaults.reference_language),

            language_data_dir: std::env::var("LANGUAGE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.language_data_dir),

            language_flag_file: std::env::var("LANGUAGE_FLAG_FILE").ok().map(PathBuf::from),
            fail_on_missing_translations: std::env::var("FAIL_ON_MISSING_TRANSLATIONS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.fail_on_missing_translations),
        }
    }

    /// Usage flag at `language_flag_file`, or the default file in the
    /// system temp directory when none is configured.
    pub fn usage_flag(&self) -> FileUsageFlag {
        match &self.language_flag_file {
            Some(path) => FileUsageFlag::new(path),
            None => FileUsageFlag::in_temp_dir(),
        }
    }
}
