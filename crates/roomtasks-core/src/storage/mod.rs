mod config;

pub use config::{Config, DigestConfig, GoogleConfig, RoomSettings};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `$ROOMTASKS_CONFIG_DIR`, or `~/.config/roomtasks/`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ROOMTASKS_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("roomtasks"),
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
