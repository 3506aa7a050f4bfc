//! TOML-based configuration and room settings.
//!
//! Stores:
//! - Google Tasks API endpoint and where to find the access token
//! - Daily digest schedule
//! - Room to task-list associations
//!
//! Configuration is stored at `~/.config/roomtasks/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::integrations::google_tasks::DEFAULT_API_BASE;

/// Google Tasks backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the OAuth access token
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
    /// Fetch completed tasks instead of open ones
    #[serde(default)]
    pub show_completed: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Daily digest schedule (local time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_digest_hour")]
    pub hour: u32,
    #[serde(default = "default_digest_minute")]
    pub minute: u32,
    #[serde(default = "default_true")]
    pub skip_weekends: bool,
}

/// Task lists associated with each room, by list title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomSettings {
    tasklists_rooms: BTreeMap<String, Vec<String>>,
}

impl RoomSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists associated with `room_id`, in association order.
    pub fn lists_for(&self, room_id: &str) -> &[String] {
        self.tasklists_rooms
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, room_id: &str, tasklist: &str) -> bool {
        self.lists_for(room_id).iter().any(|name| name == tasklist)
    }

    /// Associate a list with a room. Returns false if it already was.
    pub fn add(&mut self, room_id: &str, tasklist: &str) -> bool {
        if self.contains(room_id, tasklist) {
            return false;
        }
        self.tasklists_rooms
            .entry(room_id.to_string())
            .or_default()
            .push(tasklist.to_string());
        true
    }

    /// Dissociate a list from a room. Returns false if it was not there.
    pub fn remove(&mut self, room_id: &str, tasklist: &str) -> bool {
        let Some(lists) = self.tasklists_rooms.get_mut(room_id) else {
            return false;
        };
        let before = lists.len();
        lists.retain(|name| name != tasklist);
        let removed = lists.len() != before;
        if lists.is_empty() {
            self.tasklists_rooms.remove(room_id);
        }
        removed
    }

    /// Rooms having at least one associated list.
    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.tasklists_rooms
            .iter()
            .filter(|(_, lists)| !lists.is_empty())
            .map(|(room, _)| room.as_str())
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/roomtasks/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub rooms: RoomSettings,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}
fn default_access_token_env() -> String {
    "GOOGLE_TASKS_ACCESS_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_digest_hour() -> u32 {
    7
}
fn default_digest_minute() -> u32 {
    30
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            access_token_env: default_access_token_env(),
            show_completed: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: default_digest_hour(),
            minute: default_digest_minute(),
            skip_weekends: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}
