// src/core/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use thiserror::Error;

use crate::crypto::DEFAULT_ITERATIONS;

pub const RECORDS_FILE_NAME: &str = "passwords.json";
pub const LOG_FILE_NAME: &str = "passgen_log.txt";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid length bounds: {0}")]
    InvalidBounds(String),

    #[error("Hash iteration count must be greater than zero")]
    InvalidIterations,

    #[error("Length {length} is outside the allowed range {min}..={max}")]
    LengthOutOfRange { length: i64, min: usize, max: usize },
}

// Configuration for the generator and its storage
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_dir: PathBuf,
    pub records_file: PathBuf,

    // Event log
    pub reports_dir: PathBuf,
    pub log_file: PathBuf,

    // Password Generation
    pub default_length: usize,
    pub min_length: usize,
    pub max_length: usize,

    // Hashing and display
    pub hash_iterations: u32,
    pub mask_visible_chars: usize,

    // Diagnostics
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        match crate::utils::get_app_data_dir() {
            Some(root) => Self::with_root(root),
            None => Self::with_dirs(PathBuf::from("./data"), PathBuf::from("./reports")),
        }
    }
}

impl Config {
    /// Config with `data/` and `reports/` under `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::with_dirs(root.join("data"), root.join("reports"))
    }

    /// Move the storage and log paths under `root`, keeping every other setting.
    pub fn rebase(&mut self, root: impl AsRef<Path>) {
        let rooted = Self::with_root(root);
        self.data_dir = rooted.data_dir;
        self.records_file = rooted.records_file;
        self.reports_dir = rooted.reports_dir;
        self.log_file = rooted.log_file;
    }

    fn with_dirs(data_dir: PathBuf, reports_dir: PathBuf) -> Self {
        Self {
            records_file: data_dir.join(RECORDS_FILE_NAME),
            data_dir,
            log_file: reports_dir.join(LOG_FILE_NAME),
            reports_dir,

            default_length: 12,
            min_length: 4,
            max_length: 64,

            hash_iterations: DEFAULT_ITERATIONS,
            mask_visible_chars: 3,

            log_level: LevelFilter::Info,
        }
    }

    // Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Apply settings from `lookup` over the defaults. Values that do not
    /// parse are skipped with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(dir) = lookup("PASSGEN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.records_file = config.data_dir.join(RECORDS_FILE_NAME);
        }

        if let Some(file) = lookup("PASSGEN_RECORDS_FILE") {
            config.records_file = PathBuf::from(file);
        }

        if let Some(dir) = lookup("PASSGEN_REPORTS_DIR") {
            config.reports_dir = PathBuf::from(dir);
            config.log_file = config.reports_dir.join(LOG_FILE_NAME);
        }

        if let Some(file) = lookup("PASSGEN_LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        read_setting(&lookup, "PASSGEN_DEFAULT_LENGTH", &mut config.default_length);
        read_setting(&lookup, "PASSGEN_MIN_LENGTH", &mut config.min_length);
        read_setting(&lookup, "PASSGEN_MAX_LENGTH", &mut config.max_length);
        read_setting(&lookup, "PASSGEN_HASH_ITERATIONS", &mut config.hash_iterations);
        read_setting(&lookup, "PASSGEN_MASK_VISIBLE", &mut config.mask_visible_chars);
        read_setting(&lookup, "LOG_LEVEL", &mut config.log_level);

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(ConfigError::InvalidBounds("minimum length must be at least 1".into()));
        }
        if self.min_length > self.max_length {
            return Err(ConfigError::InvalidBounds(format!(
                "minimum {} exceeds maximum {}",
                self.min_length, self.max_length
            )));
        }
        if self.default_length < self.min_length || self.default_length > self.max_length {
            return Err(ConfigError::InvalidBounds(format!(
                "default {} outside {}..={}",
                self.default_length, self.min_length, self.max_length
            )));
        }
        if self.hash_iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        Ok(())
    }

    /// Enforce the prompt-level length bounds.
    pub fn check_length(&self, length: i64) -> Result<usize, ConfigError> {
        let out_of_range = ConfigError::LengthOutOfRange {
            length,
            min: self.min_length,
            max: self.max_length,
        };
        let value = usize::try_from(length).map_err(|_| out_of_range.clone())?;
        if value < self.min_length || value > self.max_length {
            return Err(out_of_range);
        }
        Ok(value)
    }
}

/// Diagnostic level for the logger, which has to exist before `load` runs
/// so that its warnings are visible. Falls back to `info` silently; `load`
/// reports a bad value once logging is up.
pub fn log_level_from_env() -> LevelFilter {
    env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn read_setting<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    if let Some(val) = lookup(key) {
        match val.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => log::warn!("Ignoring invalid value for {}: '{}'", key, val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn rooted_config_places_files_in_data_and_reports() {
        let temp = tempdir().expect("tempdir");
        let config = Config::with_root(temp.path());

        assert_eq!(config.records_file, temp.path().join("data").join("passwords.json"));
        assert_eq!(config.log_file, temp.path().join("reports").join("passgen_log.txt"));
        assert_eq!(config.default_length, 12);
        assert_eq!(config.hash_iterations, 100_000);
        assert!(config.validate().is_ok());
        // constructing a config does not touch the filesystem
        assert!(!config.data_dir.exists());
    }

    #[test]
    fn validate_rejects_bad_bounds() {
        let temp = tempdir().expect("tempdir");
        let mut config = Config::with_root(temp.path());

        config.min_length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBounds(_))));

        config.min_length = 80;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBounds(_))));

        config.min_length = 4;
        config.default_length = 100;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBounds(_))));

        config.default_length = 12;
        config.hash_iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidIterations));
    }

    #[test]
    fn length_bounds() {
        let config = Config::with_root("/tmp/passgen-test");
        assert_eq!(config.check_length(4), Ok(4));
        assert_eq!(config.check_length(64), Ok(64));
        assert!(config.check_length(3).is_err());
        assert!(config.check_length(65).is_err());
        assert!(config.check_length(-1).is_err());
    }

    #[test]
    fn rebase_moves_paths_only() {
        let mut config = Config::with_root("/srv/a");
        config.max_length = 128;
        config.rebase("/srv/b");
        assert_eq!(config.records_file, PathBuf::from("/srv/b/data/passwords.json"));
        assert_eq!(config.log_file, PathBuf::from("/srv/b/reports/passgen_log.txt"));
        assert_eq!(config.max_length, 128);
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn settings_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PASSGEN_DATA_DIR", "/srv/passgen/data"),
            ("PASSGEN_LOG_FILE", "/var/log/passgen.txt"),
            ("PASSGEN_DEFAULT_LENGTH", "20"),
            ("PASSGEN_HASH_ITERATIONS", "5000"),
            ("LOG_LEVEL", "Debug"),
        ]));

        assert_eq!(config.records_file, PathBuf::from("/srv/passgen/data/passwords.json"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/passgen.txt"));
        assert_eq!(config.default_length, 20);
        assert_eq!(config.hash_iterations, 5000);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn unparseable_settings_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PASSGEN_MIN_LENGTH", "abc"),
            ("PASSGEN_MASK_VISIBLE", "-2"),
            ("LOG_LEVEL", "bogus"),
        ]));

        assert_eq!(config.min_length, 4);
        assert_eq!(config.mask_visible_chars, 3);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(config.validate().is_ok());
    }
}
