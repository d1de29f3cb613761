use log::{debug, info};

use crate::component::InstallContext;
use crate::config::{BootOptions, ConfigData};
use crate::kernel::constants;
use crate::kernel::context::ExecContext;
use crate::kernel::error::Result;
use crate::lifecycle::HookCollector;
use crate::registry::Registry;

/// Wiring for one bring-up/tear-down of a registry's components.
///
/// Owns the execution context, the settings and the hook collector, and
/// builds the [`InstallContext`] for every install. Starting and stopping the
/// collected hooks is left to the caller.
pub struct Bootstrap<'r> {
    registry: &'r Registry,
    exec: ExecContext,
    hooks: HookCollector,
    config: ConfigData,
    options: BootOptions,
}

impl<'r> Bootstrap<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);
        Self {
            registry,
            exec: ExecContext::new(),
            hooks: HookCollector::new(),
            config: ConfigData::new(),
            options: BootOptions::default(),
        }
    }

    /// Use `config` for component settings and engine options.
    pub fn with_config(mut self, config: ConfigData) -> Result<Self> {
        self.options = BootOptions::from_config(&config)?;
        debug!(
            "Bootstrap settings sections: [{}], on_failure={:?}",
            config.keys().join(", "),
            self.options.on_failure
        );
        self.config = config;
        Ok(self)
    }

    /// Override the engine options read from the settings.
    pub fn with_options(mut self, options: BootOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn exec(&self) -> &ExecContext {
        &self.exec
    }

    pub fn hooks(&self) -> &HookCollector {
        &self.hooks
    }

    pub fn config(&self) -> &ConfigData {
        &self.config
    }

    pub fn options(&self) -> BootOptions {
        self.options
    }

    /// Install the named components (everything when `names` is empty).
    pub fn install(&self, names: &[&str]) -> Result<()> {
        let ctx = InstallContext::new(&self.exec, &self.hooks)
            .with_config(&self.config)
            .on_failure(self.options.on_failure);
        self.registry.install(&ctx, names)
    }

    /// Uninstall the named components (everything when `names` is empty).
    pub fn uninstall(&self, names: &[&str]) -> Result<()> {
        self.registry.uninstall(names)
    }
}
