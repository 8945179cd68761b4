// src/core/vault.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::backups::{BackupError, BackupManager};
use crate::core::config::{Config, ConfigError};
use crate::crypto::{self, CryptoError};
use crate::db::{DbError, LoadOutcome, RecordStore};
use crate::generators::{GeneratorError, PasswordGenerator};
use crate::logging::{self, EventLog, EventSink, LogEntry, LogFilter, LogLevel, LoggingError};
use crate::models::{CredentialRecord, Tier};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, VaultError>;

/// Entry point for the CLI: generation, storage and maintenance, with every
/// action reported to the event sink.
pub struct Vault<S: EventSink = EventLog> {
    config: Config,
    generator: PasswordGenerator,
    store: RecordStore,
    backups: BackupManager,
    events: S,
}

impl Vault<EventLog> {
    /// Vault writing events to the configured log file.
    pub fn open(config: Config) -> Result<Self> {
        let events = EventLog::new(config.log_file.clone());
        Self::new(config, events)
    }
}

impl<S: EventSink> Vault<S> {
    pub fn new(config: Config, events: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            generator: PasswordGenerator::new(),
            store: RecordStore::new(config.records_file.clone(), config.hash_iterations),
            backups: BackupManager::new(&config),
            config,
            events,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn generate(&self, length: i64, tier: Tier) -> Result<String> {
        let password = self.generator.generate(length, tier)?;
        logging::password_generated(&self.events, password.len(), tier);
        Ok(password)
    }

    pub fn save(&self, service: &str, username: &str, secret: &str) -> Result<CredentialRecord> {
        let record = self.store.append(service, username, secret)?;
        logging::password_saved(&self.events, &record.service, &record.username);
        Ok(record)
    }

    pub fn records(&self) -> Vec<CredentialRecord> {
        let outcome = self.store.load_outcome();
        if let LoadOutcome::Unreadable(reason) | LoadOutcome::Corrupt(reason) = &outcome {
            self.events.emit(
                &format!("Saved passwords could not be read, treating as empty: {}", reason),
                LogLevel::Warning,
            );
        }
        let records = outcome.into_records();
        logging::passwords_listed(&self.events, records.len());
        records
    }

    /// Check against the newest record for the pair. `None` when no record
    /// exists for the service/username pair.
    pub fn verify(&self, service: &str, username: &str, secret: &str) -> Result<Option<bool>> {
        match self.store.find(service, username) {
            Some(record) => self.verify_record(&record, secret).map(Some),
            None => Ok(None),
        }
    }

    /// Check against one specific record, e.g. an older entry picked from a list.
    pub fn verify_record(&self, record: &CredentialRecord, secret: &str) -> Result<bool> {
        let matched = crypto::verify_password(secret, &record.secret_hash)?;
        self.events.emit(
            &format!(
                "Verified password service='{}' username='{}' result={}",
                record.service,
                record.username,
                if matched { "match" } else { "mismatch" }
            ),
            LogLevel::Info,
        );
        Ok(matched)
    }

    pub fn mask(&self, secret: &str) -> String {
        crypto::mask_password(secret, self.config.mask_visible_chars)
    }

    pub fn backup_records(&self) -> Result<PathBuf> {
        let path = self.backups.backup_records()?;
        logging::backup_created(&self.events, &path);
        Ok(path)
    }

    pub fn backup_log(&self) -> Result<Option<PathBuf>> {
        let path = self.backups.backup_log()?;
        if let Some(path) = &path {
            logging::log_backup_created(&self.events, path);
        }
        Ok(path)
    }

    pub fn reset_records(&self) -> Result<()> {
        self.backups.reset_records()?;
        logging::passwords_reset(&self.events);
        Ok(())
    }

    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        Ok(self.backups.list_backups()?)
    }

    pub fn recent_events(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let filter = LogFilter {
            limit: Some(limit),
            ..Default::default()
        };
        Ok(EventLog::new(self.config.log_file.clone()).read_entries(&filter)?)
    }

    /// Record an unexpected failure. Only the context string is logged.
    pub fn report_error(&self, context: &str) {
        self.events.emit(context, LogLevel::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::fs;
    use tempfile::tempdir;

    fn vault_in(dir: &std::path::Path) -> Vault<MemorySink> {
        let mut config = Config::with_root(dir);
        config.hash_iterations = 1_000;
        Vault::new(config, MemorySink::new()).unwrap()
    }

    #[test]
    fn generate_logs_metadata_without_secret() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());

        let password = vault.generate(20, Tier::Hard).unwrap();

        assert_eq!(password.len(), 20);
        let events = vault.events().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, LogLevel::Info);
        assert!(events[0].1.contains("length=20"));
        assert!(!events[0].1.contains(&password));
    }

    #[test]
    fn failed_generation_is_not_logged() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());

        let err = vault.generate(0, Tier::Easy).unwrap_err();
        assert!(matches!(err, VaultError::Generator(GeneratorError::InvalidLength(0))));
        assert!(vault.events().events().is_empty());
    }

    #[test]
    fn save_list_and_verify() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());

        vault.save("GitHub", "kalle", "PwdThree789!").unwrap();

        let records = vault.records();
        assert_eq!(records.len(), 1);
        assert_eq!(vault.verify("GitHub", "kalle", "PwdThree789!").unwrap(), Some(true));
        assert_eq!(vault.verify("GitHub", "kalle", "wrong").unwrap(), Some(false));
        assert_eq!(vault.verify("GitHub", "nobody", "PwdThree789!").unwrap(), None);

        let events = vault.events().events();
        assert!(events.iter().all(|(_, message)| !message.contains("PwdThree789!")));
        assert!(events.iter().any(|(_, m)| m == "Listed saved passwords count=1"));
    }

    #[test]
    fn verify_record_uses_the_chosen_duplicate() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());
        vault.save("GitHub", "kalle", "OldSecret1!").unwrap();
        vault.save("GitHub", "kalle", "NewSecret2!").unwrap();

        let records = vault.records();
        assert!(vault.verify_record(&records[0], "OldSecret1!").unwrap());
        assert!(!vault.verify_record(&records[0], "NewSecret2!").unwrap());
        // lookup by pair goes to the newest record
        assert_eq!(vault.verify("GitHub", "kalle", "OldSecret1!").unwrap(), Some(false));
    }

    #[test]
    fn corrupt_store_is_reported_as_warning() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());
        fs::create_dir_all(&vault.config().data_dir).unwrap();
        fs::write(&vault.config().records_file, "{ not json").unwrap();

        assert!(vault.records().is_empty());

        let events = vault.events().events();
        assert_eq!(events[0].0, LogLevel::Warning);
        assert!(events[0].1.starts_with("Saved passwords could not be read"));
        assert_eq!(events[1].1, "Listed saved passwords count=0");
    }

    #[test]
    fn maintenance_emits_backup_and_warning_levels() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());
        vault.save("Gmail", "user1", "secret").unwrap();

        let backup = vault.backup_records().unwrap();
        assert!(backup.exists());
        assert_eq!(vault.list_backups().unwrap(), vec![backup]);
        assert_eq!(vault.backup_log().unwrap(), None);
        vault.reset_records().unwrap();
        assert!(vault.records().is_empty());

        let levels: Vec<LogLevel> = vault.events().events().iter().map(|(l, _)| *l).collect();
        assert!(levels.contains(&LogLevel::Backup));
        assert!(levels.contains(&LogLevel::Warning));
    }

    #[test]
    fn mask_uses_configured_visible_chars() {
        let temp = tempdir().expect("tempdir");
        let vault = vault_in(temp.path());
        assert_eq!(vault.mask("MyVerySecret"), "MyV*********");
    }

    #[test]
    fn file_backed_vault_writes_event_log() {
        let temp = tempdir().expect("tempdir");
        let mut config = Config::with_root(temp.path());
        config.hash_iterations = 1_000;
        let vault = Vault::open(config.clone()).unwrap();

        vault.generate(8, Tier::Easy).unwrap();
        vault.report_error("Unexpected error in menu action 'generate'");

        let log = fs::read_to_string(&config.log_file).unwrap();
        assert!(log.contains("[INFO] Generated password length=8 difficulty='easy'"));
        assert!(log.contains("[ERROR] Unexpected error"));

        let backup = vault.backup_log().unwrap().unwrap();
        assert!(fs::read_to_string(backup).unwrap().starts_with(&log));
        let recent = vault.recent_events(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].level, LogLevel::Backup);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let mut config = Config::with_root(temp.path());
        config.hash_iterations = 0;
        assert!(matches!(
            Vault::new(config, MemorySink::new()),
            Err(VaultError::Config(ConfigError::InvalidIterations))
        ));
    }
}
