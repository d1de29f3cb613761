//! # Bootkit Configuration
//!
//! Settings reach capability instances through the [`Unmarshal`] trait, called
//! once per install right before the instance's `init`. The stock provider is
//! [`ConfigData`]: a map of sections keyed by component name, loadable from
//! JSON, YAML (`yaml-config`) or TOML (`toml-config`) files. A component
//! without a section is left alone.
//!
//! [`BootOptions`] holds the engine's own options, read from the `bootkit`
//! section.
pub mod data;
pub mod error;
pub mod options;

pub use data::{ConfigData, ConfigFormat};
pub use error::ConfigError;
pub use options::BootOptions;

use serde::de::DeserializeOwned;

use crate::component::Instance;
use crate::kernel::context::ExecContext;
use crate::kernel::error::Result;

/// Configuration provider: pours externally sourced settings into an instance.
pub trait Unmarshal: Send + Sync {
    fn unmarshal(&self, exec: &ExecContext, name: &str, target: &mut dyn Instance) -> Result<()>;
}

/// Provider with no settings at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl Unmarshal for NoConfig {
    fn unmarshal(&self, _exec: &ExecContext, _name: &str, _target: &mut dyn Instance) -> Result<()> {
        Ok(())
    }
}

impl Unmarshal for ConfigData {
    fn unmarshal(&self, _exec: &ExecContext, name: &str, target: &mut dyn Instance) -> Result<()> {
        match self.section(name) {
            Some(settings) => {
                log::trace!("Applying settings section '{}'", name);
                target.configure(settings)
            }
            None => Ok(()),
        }
    }
}

/// Turn a settings section into a typed value, for use in
/// [`Instance::configure`].
pub fn decode<T: DeserializeOwned>(section: &str, settings: &serde_json::Value) -> Result<T> {
    serde_json::from_value(settings.clone()).map_err(|e| {
        ConfigError::InvalidSection {
            section: section.to_string(),
            source: e,
        }
        .into()
    })
}

// Test module declaration
#[cfg(test)]
mod tests;
