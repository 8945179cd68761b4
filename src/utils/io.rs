// src/utils/io.rs
use std::path::PathBuf;

/// Platform data directory for the application, if one can be determined.
/// Nothing is created here; writers create directories on demand.
pub fn get_app_data_dir() -> Option<PathBuf> {
    match directories::ProjectDirs::from("com", "passgen", "passgen") {
        Some(proj_dirs) => Some(proj_dirs.data_dir().to_path_buf()),
        None => {
            log::warn!("Could not determine data directory, falling back to the working directory");
            None
        }
    }
}
