// src/db/json.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

/// Outcome of reading a JSON document from disk.
#[derive(Debug)]
pub enum JsonRead {
    Parsed(Value),
    Missing,
    Unreadable(io::Error),
    Invalid(serde_json::Error),
}

pub fn read_json_file(path: &Path) -> JsonRead {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return JsonRead::Missing,
        Err(e) => return JsonRead::Unreadable(e),
    };

    match serde_json::from_str(&content) {
        Ok(value) => JsonRead::Parsed(value),
        Err(e) => JsonRead::Invalid(e),
    }
}

/// Serialize `data` fully, then replace `path` in one rename so readers see
/// either the old document or the new one. Creates the parent directory.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, data: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data).map_err(io::Error::from)?;

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, json.as_bytes())?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
