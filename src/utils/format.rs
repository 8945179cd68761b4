// src/utils/format.rs
use chrono::Local;

/// Second-precision ISO-8601 local timestamp, e.g. `2025-12-10T21:37:12`.
pub fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Sortable, filesystem-safe timestamp for backup file names, e.g. `20251210_214530`.
pub fn backup_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

// Truncate a string if it's too long
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
