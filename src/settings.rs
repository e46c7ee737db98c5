//! Application settings persisted as a JSON object.
//!
//! Loading merges each known key over the defaults on its own, so one bad
//! value never discards the rest of the file. Saving keeps keys this version
//! does not know about.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOperation {
    #[default]
    RecycleBin,
    Permanently,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Normal,
    Debug,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Normal => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_scan_subfolders")]
    pub scan_subfolders: bool,

    #[serde(default)]
    pub delete_operation: DeleteOperation,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,

    #[serde(default)]
    pub hide_guidance_on_startup: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scan_subfolders: default_scan_subfolders(),
            delete_operation: DeleteOperation::default(),
            log_level: LogLevel::default(),
            log_file_path: default_log_file_path(),
            hide_guidance_on_startup: false,
        }
    }
}

fn default_scan_subfolders() -> bool {
    true
}

fn default_log_file_path() -> String {
    directories::ProjectDirs::from("", "", "imgtidy")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
        .to_string_lossy()
        .into_owned()
}

const KEY_SCAN_SUBFOLDERS: &str = "scanSubfolders";
const KEY_DELETE_OPERATION: &str = "deleteOperation";
const KEY_LOG_LEVEL: &str = "logLevel";
const KEY_LOG_FILE_PATH: &str = "logFilePath";
const KEY_HIDE_GUIDANCE: &str = "hideGuidanceOnStartup";

impl AppSettings {
    /// Overlay the known keys of a JSON object onto the defaults.
    pub fn merged_from(object: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        merge_key(object, KEY_SCAN_SUBFOLDERS, &mut settings.scan_subfolders);
        merge_key(object, KEY_DELETE_OPERATION, &mut settings.delete_operation);
        merge_key(object, KEY_LOG_LEVEL, &mut settings.log_level);
        merge_key(object, KEY_LOG_FILE_PATH, &mut settings.log_file_path);
        merge_key(object, KEY_HIDE_GUIDANCE, &mut settings.hide_guidance_on_startup);
        settings
    }

    /// Write the known keys into an existing JSON object.
    fn write_into(&self, object: &mut Map<String, Value>) -> Result<()> {
        let value = serde_json::to_value(self).context("Failed to serialize settings")?;
        if let Value::Object(fields) = value {
            object.extend(fields);
        }
        Ok(())
    }
}

fn merge_key<T: DeserializeOwned>(object: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = object.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => log::warn!("Ignoring invalid setting {}: {}", key, e),
    }
}

/// Settings collaborator.
pub trait SettingsStore {
    fn app_settings(&self) -> Result<AppSettings>;

    fn save_app_settings(&self, settings: &AppSettings) -> Result<()>;
}

/// "Hide guidance on startup" flag collaborator.
pub trait GuidanceStore {
    fn guidance_hidden(&self) -> Result<bool>;

    fn save_guidance_hidden(&self, hidden: bool) -> Result<()>;
}

/// Settings stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/imgtidy/settings.json`
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "imgtidy")
            .context("Could not determine the user configuration directory")?;
        Ok(Self::new(dirs.config_dir().join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents as a JSON object. A missing file is empty; a file
    /// that is not a JSON object is reported.
    fn read_object(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", self.path.display()))?;
        match value {
            Value::Object(object) => Ok(object),
            _ => anyhow::bail!(
                "Settings file {} does not contain a JSON object",
                self.path.display()
            ),
        }
    }

    fn write_object(&self, object: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let json = serde_json::to_string_pretty(object).context("Failed to serialize settings")?;
        fs::write(&self.path, json).context("Failed to write settings file")?;
        Ok(())
    }

    /// Base object for a save. Unknown keys are kept; an unreadable file is
    /// logged and then replaced.
    fn object_for_update(&self) -> Map<String, Value> {
        match self.read_object() {
            Ok(object) => object,
            Err(e) => {
                log::warn!("Replacing unreadable settings file: {:#}", e);
                Map::new()
            }
        }
    }

    /// Load settings, or return defaults if the file cannot be used.
    pub fn load_or_default(&self) -> AppSettings {
        match self.app_settings() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                AppSettings::default()
            }
        }
    }
}

impl SettingsStore for JsonSettingsFile {
    fn app_settings(&self) -> Result<AppSettings> {
        Ok(AppSettings::merged_from(&self.read_object()?))
    }

    fn save_app_settings(&self, settings: &AppSettings) -> Result<()> {
        let mut object = self.object_for_update();
        settings.write_into(&mut object)?;
        self.write_object(&object)
    }
}

impl GuidanceStore for JsonSettingsFile {
    fn guidance_hidden(&self) -> Result<bool> {
        Ok(self.app_settings()?.hide_guidance_on_startup)
    }

    fn save_guidance_hidden(&self, hidden: bool) -> Result<()> {
        let mut object = self.object_for_update();
        object.insert(KEY_HIDE_GUIDANCE.to_string(), Value::Bool(hidden));
        self.write_object(&object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert!(settings.scan_subfolders);
        assert_eq!(settings.delete_operation, DeleteOperation::RecycleBin);
        assert_eq!(settings.log_level, LogLevel::Normal);
        assert!(!settings.hide_guidance_on_startup);
        assert!(settings.log_file_path.ends_with("logs"));
    }

    #[test]
    fn test_merge_partial_object() {
        let settings = AppSettings::merged_from(&object(json!({
            "scanSubfolders": false,
            "logLevel": "debug"
        })));
        assert!(!settings.scan_subfolders);
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.delete_operation, DeleteOperation::RecycleBin);
    }

    #[test]
    fn test_invalid_value_falls_back_per_key() {
        let settings = AppSettings::merged_from(&object(json!({
            "deleteOperation": "shred",
            "logLevel": 7,
            "hideGuidanceOnStartup": true,
            "somethingNew": [1, 2, 3]
        })));
        assert_eq!(settings.delete_operation, DeleteOperation::RecycleBin);
        assert_eq!(settings.log_level, LogLevel::Normal);
        assert!(settings.hide_guidance_on_startup);
    }

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(AppSettings {
            delete_operation: DeleteOperation::Permanently,
            ..AppSettings::default()
        })
        .unwrap();
        assert_eq!(value["deleteOperation"], "permanently");
        assert_eq!(value["logLevel"], "normal");
        assert_eq!(value["scanSubfolders"], true);
        assert_eq!(value["hideGuidanceOnStartup"], false);
    }

    #[test]
    fn test_log_level_filters() {
        assert_eq!(LogLevel::Error.to_filter(), log::LevelFilter::Error);
        assert_eq!(LogLevel::Normal.to_filter(), log::LevelFilter::Info);
        assert_eq!(LogLevel::Debug.to_filter(), log::LevelFilter::Debug);
    }
}
