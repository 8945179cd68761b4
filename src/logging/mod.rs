// src/logging/mod.rs
#[cfg(test)]
use std::cell::RefCell;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::models::Tier;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
}

pub type Result<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Backup,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Backup => write!(f, "BACKUP"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "BACKUP" => Ok(LogLevel::Backup),
            other => Err(LoggingError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct LogFilter {
    pub min_level: Option<LogLevel>,
    pub search_term: Option<String>,
    pub limit: Option<usize>,
}

/// Receives application events. Messages carry metadata only, never secrets.
pub trait EventSink {
    fn emit(&self, message: &str, level: LogLevel);
}

/// Append-only text event log: `YYYY-MM-DD HH:MM:SS [LEVEL] message`.
pub struct EventLog {
    log_file: PathBuf,
}

impl EventLog {
    pub fn new(log_file: PathBuf) -> Self {
        Self { log_file }
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    pub fn log(&self, message: &str, level: LogLevel) -> Result<()> {
        if let Some(parent) = self.log_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let mut line = format_line(&Local::now().naive_local(), level, message);
        line.push('\n');
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Read entries back, skipping lines that do not parse. A missing log
    /// yields no entries.
    pub fn read_entries(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let content = match fs::read_to_string(&self.log_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter_map(parse_log_line)
            .filter(|entry| entry_matches_filter(entry, filter))
            .collect();

        // keep the newest `limit` entries, oldest first
        if let Some(limit) = filter.limit {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }

        Ok(entries)
    }
}

impl EventSink for EventLog {
    fn emit(&self, message: &str, level: LogLevel) {
        if let Err(e) = self.log(message, level) {
            log::warn!("Failed to write event log {}: {}", self.path().display(), e);
        }
    }
}

/// Collects events in memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
    events: RefCell<Vec<(LogLevel, String)>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(LogLevel, String)> {
        self.events.borrow().clone()
    }
}

#[cfg(test)]
impl EventSink for MemorySink {
    fn emit(&self, message: &str, level: LogLevel) {
        self.events.borrow_mut().push((level, message.to_string()));
    }
}

/// One event per line: line breaks inside `message` become spaces.
pub fn format_line(timestamp: &NaiveDateTime, level: LogLevel, message: &str) -> String {
    let message = message.replace(|c: char| c == '\r' || c == '\n', " ");
    format!("{} [{}] {}", timestamp.format(TIMESTAMP_FORMAT), level, message)
}

fn parse_log_line(line: &str) -> Option<LogEntry> {
    // 2025-12-10 21:37:12 [INFO] message
    if line.len() < 20 || !line.is_char_boundary(19) {
        return None;
    }
    let (timestamp_str, rest) = line.split_at(19);
    let timestamp = NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT).ok()?;

    let rest = rest.strip_prefix(" [")?;
    let level_end = rest.find(']')?;
    let level = rest[..level_end].parse().ok()?;
    let message = rest[level_end + 1..].strip_prefix(' ').unwrap_or("").to_string();

    Some(LogEntry {
        timestamp,
        level,
        message,
    })
}

fn entry_matches_filter(entry: &LogEntry, filter: &LogFilter) -> bool {
    if let Some(min_level) = filter.min_level {
        if entry.level < min_level {
            return false;
        }
    }

    if let Some(term) = &filter.search_term {
        if !entry.message.contains(term.as_str()) {
            return false;
        }
    }

    true
}

// Standard event messages

pub fn password_generated(sink: &dyn EventSink, length: usize, tier: Tier) {
    sink.emit(
        &format!("Generated password length={} difficulty='{}'", length, tier),
        LogLevel::Info,
    );
}

pub fn password_saved(sink: &dyn EventSink, service: &str, username: &str) {
    sink.emit(
        &format!("Saved password service='{}' username='{}'", service, username),
        LogLevel::Info,
    );
}

pub fn passwords_listed(sink: &dyn EventSink, count: usize) {
    sink.emit(&format!("Listed saved passwords count={}", count), LogLevel::Info);
}

pub fn backup_created(sink: &dyn EventSink, backup_path: &Path) {
    sink.emit(
        &format!("Password backup created at {}", backup_path.display()),
        LogLevel::Backup,
    );
}

pub fn log_backup_created(sink: &dyn EventSink, backup_path: &Path) {
    sink.emit(
        &format!("Log backup created at {}", backup_path.display()),
        LogLevel::Backup,
    );
}

pub fn passwords_reset(sink: &dyn EventSink) {
    sink.emit("Password storage reset to empty list", LogLevel::Warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lines_are_appended_in_expected_format() {
        let temp = tempdir().expect("tempdir");
        let log = EventLog::new(temp.path().join("reports").join("passgen_log.txt"));

        log.log("first", LogLevel::Info).unwrap();
        log.log("second", LogLevel::Backup).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));
        assert!(lines[0].ends_with(" [INFO] first"));
        assert!(lines[1].ends_with(" [BACKUP] second"));
        assert!(NaiveDateTime::parse_from_str(&lines[0][..19], TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn embedded_line_breaks_cannot_add_entries() {
        let temp = tempdir().expect("tempdir");
        let log = EventLog::new(temp.path().join("passgen_log.txt"));

        password_saved(&log, "Gmail'\n2020-01-01 00:00:00 [ERROR] injected", "user\r\nname");

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        let entries = log.read_entries(&LogFilter::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert!(entries[0].message.contains("Gmail' 2020-01-01 00:00:00 [ERROR] injected"));
        assert!(entries[0].message.ends_with("username='user  name'"));
    }

    #[test]
    fn read_entries_parses_and_filters() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("passgen_log.txt");
        fs::write(
            &path,
            "2025-12-10 22:40:00 [INFO] Generated password length=12 difficulty='easy'\n\
             garbage line\n\
             2025-12-10 22:41:00 [WARNING] Password storage reset to empty list\n\
             2025-12-10 22:42:00 [BACKUP] Password backup created at /tmp/x.json\n\
             2025-12-10 22:43:00 [DEBUG] unknown level\n",
        )
        .unwrap();
        let log = EventLog::new(path);

        let all = log.read_entries(&LogFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].level, LogLevel::Warning);
        assert_eq!(all[1].message, "Password storage reset to empty list");

        let warnings = log
            .read_entries(&LogFilter { min_level: Some(LogLevel::Warning), ..Default::default() })
            .unwrap();
        assert_eq!(warnings.len(), 1);

        let last = log
            .read_entries(&LogFilter { limit: Some(1), ..Default::default() })
            .unwrap();
        assert_eq!(last[0].level, LogLevel::Backup);

        let search = log
            .read_entries(&LogFilter { search_term: Some("length=12".into()), ..Default::default() })
            .unwrap();
        assert_eq!(search.len(), 1);
    }

    #[test]
    fn missing_log_reads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let log = EventLog::new(temp.path().join("absent.txt"));
        assert!(log.read_entries(&LogFilter::default()).unwrap().is_empty());
        assert!(!log.path().exists());
    }

    #[test]
    fn helper_messages_carry_metadata_only() {
        let sink = MemorySink::new();
        password_generated(&sink, 16, Tier::Hard);
        password_saved(&sink, "Gmail", "user1");
        passwords_listed(&sink, 3);
        passwords_reset(&sink);

        let events = sink.events();
        assert_eq!(events[0], (LogLevel::Info, "Generated password length=16 difficulty='hard'".to_string()));
        assert_eq!(events[1], (LogLevel::Info, "Saved password service='Gmail' username='user1'".to_string()));
        assert_eq!(events[2].1, "Listed saved passwords count=3");
        assert_eq!(events[3].0, LogLevel::Warning);
    }

    #[test]
    fn level_names_round_trip() {
        for level in [LogLevel::Info, LogLevel::Warning, LogLevel::Error, LogLevel::Backup] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert!("DEBUG".parse::<LogLevel>().is_err());
    }
}
