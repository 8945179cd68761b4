// src/db/mod.rs
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::crypto::{self, CryptoError};
use crate::models::CredentialRecord;
use crate::utils;

pub mod json;

use json::{read_json_file, write_json_file, JsonRead};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Hashing error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Result of reading the store. Only `Loaded` carries records; every other
/// variant reads as an empty store.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<CredentialRecord>),
    Missing,
    Unreadable(String),
    Corrupt(String),
}

impl LoadOutcome {
    pub fn into_records(self) -> Vec<CredentialRecord> {
        match self {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Missing | LoadOutcome::Unreadable(_) | LoadOutcome::Corrupt(_) => Vec::new(),
        }
    }
}

/// JSON-file backed, append-only list of credential records.
pub struct RecordStore {
    path: PathBuf,
    hash_iterations: u32,
}

impl RecordStore {
    pub fn new(path: PathBuf, hash_iterations: u32) -> Self {
        Self { path, hash_iterations }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        let value = match read_json_file(&self.path) {
            JsonRead::Parsed(value) => value,
            JsonRead::Missing => return LoadOutcome::Missing,
            JsonRead::Unreadable(e) => {
                log::warn!("Record store {} is unreadable: {}", self.path.display(), e);
                return LoadOutcome::Unreadable(e.to_string());
            }
            JsonRead::Invalid(e) => {
                log::warn!("Record store {} is not valid JSON: {}", self.path.display(), e);
                return LoadOutcome::Corrupt(e.to_string());
            }
        };

        if !value.is_array() {
            log::warn!("Record store {} does not hold a list", self.path.display());
            return LoadOutcome::Corrupt("expected a JSON array".to_string());
        }

        match serde_json::from_value::<Vec<CredentialRecord>>(value) {
            Ok(records) => LoadOutcome::Loaded(records),
            Err(e) => {
                log::warn!("Record store {} has malformed records: {}", self.path.display(), e);
                LoadOutcome::Corrupt(e.to_string())
            }
        }
    }

    /// All records in insertion order. Missing or corrupt storage reads as empty.
    pub fn load(&self) -> Vec<CredentialRecord> {
        self.load_outcome().into_records()
    }

    /// Hash the secret, append a timestamped record and rewrite the file.
    pub fn append(&self, service: &str, username: &str, secret: &str) -> Result<CredentialRecord> {
        if service.trim().is_empty() {
            return Err(DbError::EmptyField("service"));
        }
        if username.trim().is_empty() {
            return Err(DbError::EmptyField("username"));
        }

        let mut records = self.load();

        let secret_hash = match self.hash_iterations {
            crypto::DEFAULT_ITERATIONS => crypto::hash_password(secret)?,
            iterations => crypto::hash_with_iterations(secret, iterations)?,
        };
        let record = CredentialRecord {
            service: service.to_string(),
            username: username.to_string(),
            secret_hash: secret_hash.to_string(),
            created_at: utils::iso_timestamp(),
        };

        records.push(record.clone());
        self.persist(&records)?;

        log::debug!("Appended record #{} to {}", records.len(), self.path.display());
        Ok(record)
    }

    /// Overwrite the store with an empty list.
    pub fn reset(&self) -> Result<()> {
        self.persist(&[])
    }

    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Most recent record for a service/username pair.
    pub fn find(&self, service: &str, username: &str) -> Option<CredentialRecord> {
        self.load()
            .into_iter()
            .rev()
            .find(|r| r.service == service && r.username == username)
    }

    pub(crate) fn persist(&self, records: &[CredentialRecord]) -> Result<()> {
        write_json_file(&self.path, records)?;
        Ok(())
    }
}
