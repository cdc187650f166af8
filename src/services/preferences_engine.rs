// Tabstash Preferences Engine
// Loads, updates and persists the save/restore preferences as a JSON file.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::platform;
use crate::types::errors::PreferencesError;
use crate::types::preferences::Preferences;

pub trait PreferencesEngineTrait {
    fn load(&mut self) -> Result<Preferences, PreferencesError>;
    fn save(&self) -> Result<(), PreferencesError>;
    fn get_preferences(&self) -> &Preferences;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), PreferencesError>;
    fn reset(&mut self) -> Result<(), PreferencesError>;
    fn get_config_path(&self) -> &str;
}

/// Preferences kept in memory and mirrored to `preferences.json`.
pub struct PreferencesEngine {
    config_path: String,
    preferences: Preferences,
}

impl PreferencesEngine {
    /// Uses `path_override` when given, else `preferences.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("preferences.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            preferences: Preferences::default(),
        }
    }
}

impl PreferencesEngineTrait for PreferencesEngine {
    /// A missing file yields the defaults. A malformed one is an error.
    fn load(&mut self) -> Result<Preferences, PreferencesError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no preferences file, using defaults");
            self.preferences = Preferences::default();
            return Ok(self.preferences.clone());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PreferencesError::IoError(format!("Failed to read preferences file: {}", e))
        })?;
        self.preferences = serde_json::from_str(&content).map_err(|e| {
            PreferencesError::SerializationError(format!("Failed to parse preferences file: {}", e))
        })?;
        Ok(self.preferences.clone())
    }

    fn save(&self) -> Result<(), PreferencesError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PreferencesError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.preferences).map_err(|e| {
            PreferencesError::SerializationError(format!("Failed to serialize preferences: {}", e))
        })?;
        fs::write(path, json).map_err(|e| {
            PreferencesError::IoError(format!("Failed to write preferences file: {}", e))
        })
    }

    fn get_preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replaces one preference by its field name and saves.
    ///
    /// The value must have the field's JSON type, e.g. `true` for
    /// `close_windows_on_save` or `["chrome://"]` for `restricted_schemes`.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), PreferencesError> {
        if key.is_empty() {
            return Err(PreferencesError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json = serde_json::to_value(&self.preferences).map_err(|e| {
            PreferencesError::SerializationError(format!("Failed to serialize preferences: {}", e))
        })?;
        match json.as_object_mut() {
            Some(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value);
            }
            _ => return Err(PreferencesError::InvalidKey(key.to_string())),
        }

        let updated: Preferences = serde_json::from_value(json).map_err(|e| {
            PreferencesError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.preferences = updated;
        self.save()?;
        info!(key, "preference updated");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PreferencesError> {
        self.preferences = Preferences::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
