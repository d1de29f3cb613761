use serde::{Deserialize, Serialize};

use crate::component::FailurePolicy;
use crate::config::data::ConfigData;
use crate::config::error::ConfigError;
use crate::kernel::constants::OPTIONS_SECTION;

/// Engine options, read from the `bootkit` section of a settings file.
///
/// ```toml
/// [bootkit]
/// on_failure = "poison"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootOptions {
    pub on_failure: FailurePolicy,
}

impl BootOptions {
    /// Options from `config`, or the defaults when the section is absent.
    pub fn from_config(config: &ConfigData) -> Result<Self, ConfigError> {
        match config.section(OPTIONS_SECTION) {
            Some(section) => serde_json::from_value(section.clone()).map_err(|e| {
                ConfigError::InvalidSection {
                    section: OPTIONS_SECTION.to_string(),
                    source: e,
                }
            }),
            None => Ok(Self::default()),
        }
    }
}
