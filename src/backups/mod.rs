// src/backups/mod.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::Config;
use crate::db::{json::write_json_file, DbError, RecordStore};
use crate::utils;

pub const BACKUP_DIR_NAME: &str = "backups";

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, BackupError>;

/// Timestamped backups and bulk reset of the record store and event log.
pub struct BackupManager {
    store: RecordStore,
    log_file: PathBuf,
}

impl BackupManager {
    pub fn new(config: &Config) -> Self {
        Self {
            store: RecordStore::new(config.records_file.clone(), config.hash_iterations),
            log_file: config.log_file.clone(),
        }
    }

    /// Snapshot the current records (empty if missing or corrupt) to
    /// `backups/passwords_{timestamp}.json` next to the live store.
    pub fn backup_records(&self) -> Result<PathBuf> {
        let records = self.store.load();
        let backup_path = unused_backup_path(self.store.path(), &utils::backup_timestamp());

        write_json_file(&backup_path, &records)?;

        log::info!("Backed up {} record(s) to {}", records.len(), backup_path.display());
        Ok(backup_path)
    }

    /// Copy the event log verbatim into `backups/` next to it. Returns `None`
    /// without touching the filesystem when there is no log yet.
    pub fn backup_log(&self) -> Result<Option<PathBuf>> {
        if !self.log_file.exists() {
            return Ok(None);
        }

        let backup_path = unused_backup_path(&self.log_file, &utils::backup_timestamp());
        if let Some(parent) = backup_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.log_file, &backup_path)?;

        log::info!("Backed up event log to {}", backup_path.display());
        Ok(Some(backup_path))
    }

    /// Destructive: replace the live store with an empty list.
    pub fn reset_records(&self) -> Result<()> {
        let removed = self.store.count();
        self.store.reset()?;
        log::info!("Reset record store {} ({} record(s) removed)", self.store.path().display(), removed);
        Ok(())
    }

    /// Record store backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        let backup_dir = match self.store.path().parent() {
            Some(parent) => parent.join(BACKUP_DIR_NAME),
            None => PathBuf::from(BACKUP_DIR_NAME),
        };
        if !backup_dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}_", file_stem(self.store.path()));
        let mut backups = Vec::new();
        for entry in fs::read_dir(backup_dir)? {
            let path = entry?.path();
            let matches = path.is_file()
                && path
                    .file_name()
                    .map_or(false, |name| name.to_string_lossy().starts_with(&prefix));
            if matches {
                backups.push(path);
            }
        }

        // timestamps sort lexically
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(backups)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string())
}

/// `{dir}/backups/{base}_{timestamp}.{ext}` for a source file at `{dir}/{base}.{ext}`.
pub fn backup_path_for(source: &Path, timestamp: &str) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new(".")).join(BACKUP_DIR_NAME);
    let mut name = format!("{}_{}", file_stem(source), timestamp);
    if let Some(ext) = source.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    dir.join(name)
}

/// Like [`backup_path_for`], but never names an existing file: later backups
/// within the same second get a `_1`, `_2`, ... suffix.
fn unused_backup_path(source: &Path, timestamp: &str) -> PathBuf {
    let mut path = backup_path_for(source, timestamp);
    let mut counter = 1;
    while path.exists() {
        path = backup_path_for(source, &format!("{}_{}", timestamp, counter));
        counter += 1;
    }
    path
}
