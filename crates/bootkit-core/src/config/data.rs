use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Format named by an extension or format name, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Settings keyed by section name. Each component reads the section named
/// after it; the `bootkit` section holds engine options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigData {
    values: HashMap<String, serde_json::Value>,
}

impl ConfigData {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a settings file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(e, "read_config", path.to_path_buf()))?;
        log::debug!("Loaded settings from {}", path.display());
        Self::deserialize(&content, format)
    }

    /// Raw section, if present
    pub fn section(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    /// Replace a whole section
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        let json_value = serde_json::to_value(value).map_err(|e| ConfigError::InvalidSection {
            section: key.to_string(),
            source: e,
        })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Apply a `SECTION.KEY=VALUE` assignment to one key of a section.
    ///
    /// `VALUE` is read as JSON when it parses as such (`8080`, `true`,
    /// `{"a":1}`) and as a plain string otherwise. A section that is missing
    /// or not an object is replaced by an object holding just this key.
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidOverride(assignment.to_string());
        let (path, raw) = assignment.split_once('=').ok_or_else(invalid)?;
        let (section, key) = path.trim().split_once('.').ok_or_else(invalid)?;
        if section.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        let mut updated = match self.section(section) {
            Some(serde_json::Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        updated.insert(key.to_string(), value);
        self.set(section, serde_json::Value::Object(updated))
    }

    /// Section names, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Merge with another config; its sections replace same-named ones
    pub fn merge(&mut self, other: &ConfigData) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SerializationError {
                format: format.extension().to_string(),
                source,
            }
        };
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self).map_err(|e| failed(e.into())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self).map_err(|e| failed(e.into())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self).map_err(|e| failed(e.into())),
        }
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::DeserializationError {
                format: format.extension().to_string(),
                source,
            }
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| failed(e.into())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| failed(e.into())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| failed(e.into())),
        }
    }
}
