//! Effective settings for one run: every `--config` file merged in order,
//! then every `--set` override applied.
use std::path::PathBuf;

use log::debug;

use bootkit_core::{ConfigData, Result};

pub fn effective(files: &[PathBuf], overrides: &[String]) -> Result<ConfigData> {
    let mut config = ConfigData::new();
    for path in files {
        config.merge(&ConfigData::load(path)?);
    }
    for assignment in overrides {
        debug!("Applying settings override '{}'", assignment);
        config.apply_override(assignment)?;
    }
    Ok(config)
}
