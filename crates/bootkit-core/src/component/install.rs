//! The install/uninstall engine.
//!
//! Installing a component is a synchronous, recursive walk: the component is
//! marked [`Installing`](InstallState::Installing), its dependencies are
//! resolved and installed (in declaration order), then its own protocol runs.
//! Seeing `Installing` on re-entry is how cycles are detected, so no lock is
//! held across the recursive calls.
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::component::behavior::{Behavior, InitContext, Instance, LegacyCallbacks};
use crate::component::dependency::{Dependencies, Resolve, Unregistered};
use crate::component::state::InstallState;
use crate::config::{NoConfig, Unmarshal};
use crate::kernel::context::ExecContext;
use crate::kernel::error::{Error, Result};
use crate::lifecycle::{Hook, Lifecycle};
use crate::utils::lock;

/// Observer invoked with each component right after its protocol succeeded.
pub type AfterHook<'a> = &'a (dyn Fn(&Arc<Component>) + Send + Sync);

/// What happens to a component whose own install attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Restore the state held before the attempt so it can be retried.
    #[default]
    Reset,
    /// Leave the component `Installing`; later attempts report a cycle.
    Poison,
}

/// Collaborators shared by every component of one install run.
#[derive(Clone, Copy)]
pub struct InstallContext<'a> {
    pub(crate) exec: &'a ExecContext,
    pub(crate) lifecycle: &'a dyn Lifecycle,
    pub(crate) config: &'a dyn Unmarshal,
    pub(crate) resolver: &'a dyn Resolve,
    pub(crate) after: Option<AfterHook<'a>>,
    pub(crate) on_failure: FailurePolicy,
}

impl<'a> InstallContext<'a> {
    /// A context with no settings source, no after hook, and a resolver that
    /// cannot resolve anything.
    pub fn new(exec: &'a ExecContext, lifecycle: &'a dyn Lifecycle) -> Self {
        Self {
            exec,
            lifecycle,
            config: &NoConfig,
            resolver: &Unregistered,
            after: None,
            on_failure: FailurePolicy::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn Resolve) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_config(mut self, config: &'a dyn Unmarshal) -> Self {
        self.config = config;
        self
    }

    pub fn after_install(mut self, after: AfterHook<'a>) -> Self {
        self.after = Some(after);
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn exec(&self) -> &'a ExecContext {
        self.exec
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }
}

impl fmt::Debug for InstallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallContext")
            .field("exec", self.exec)
            .field("has_after_hook", &self.after.is_some())
            .field("on_failure", &self.on_failure)
            .finish()
    }
}

impl Component {
    /// Install this component and, first, everything it requires.
    ///
    /// Installing an already installed component is a no-op. Re-entering a
    /// component that is still installing fails with
    /// [`Error::CircularDependency`] and leaves its state untouched.
    pub fn install(self: &Arc<Self>, ctx: &InstallContext<'_>) -> Result<()> {
        let previous = {
            let mut state = lock(&self.state);
            let current = *state;
            if current.is_installed() {
                trace!("Component '{}' already installed", self.name);
                return Ok(());
            }
            if !current.accepts_install() {
                return Err(Error::CircularDependency(self.name.clone()));
            }
            *state = InstallState::Installing;
            current
        };
        debug!("Installing component '{}' (was {})", self.name, previous);

        match self.run_install(ctx) {
            Ok(()) => {
                self.set_state(InstallState::Installed);
                debug!("Component '{}' installed", self.name);
                Ok(())
            }
            Err(e) => {
                if ctx.on_failure == FailurePolicy::Reset {
                    self.set_state(previous);
                }
                debug!("Install of component '{}' failed: {}", self.name, e);
                Err(e)
            }
        }
    }

    fn run_install(self: &Arc<Self>, ctx: &InstallContext<'_>) -> Result<()> {
        let required = self.resolve_required(ctx.resolver)?;
        for dependency in &required {
            dependency.install(ctx)?;
        }

        {
            let mut behavior = lock(&self.behavior);
            match &mut *behavior {
                Behavior::Instance(instance) => {
                    self.init_instance(instance.as_mut(), &required, ctx)?
                }
                Behavior::Legacy(callbacks) => self.init_legacy(callbacks, &required, ctx)?,
            }
        }

        if let Some(after) = ctx.after {
            after(self);
        }
        Ok(())
    }

    fn init_instance(
        self: &Arc<Self>,
        instance: &mut dyn Instance,
        required: &Dependencies,
        ctx: &InstallContext<'_>,
    ) -> Result<()> {
        ctx.config.unmarshal(ctx.exec, &self.name, instance)?;

        instance.init(&InitContext {
            exec: ctx.exec,
            component: self,
            required,
            lifecycle: None,
        })?;

        if let Some(handler) = instance.start_stop() {
            trace!("Registering start/stop hook for component '{}'", self.name);
            ctx.lifecycle.append(Hook::new(self.name.clone(), handler));
        }

        if let Some(validator) = instance.validator() {
            validator.validate()?;
        }
        Ok(())
    }

    fn init_legacy(
        self: &Arc<Self>,
        callbacks: &mut LegacyCallbacks,
        required: &Dependencies,
        ctx: &InstallContext<'_>,
    ) -> Result<()> {
        if let Some(init) = callbacks.init_ctx.as_mut() {
            init(&InitContext {
                exec: ctx.exec,
                component: self,
                required,
                lifecycle: Some(ctx.lifecycle),
            })?;
        }

        if let Some(init) = callbacks.init.as_mut() {
            let provision = init(ctx.exec, ctx.lifecycle, required)?;
            *lock(&self.value) = provision.value;
            // A builder cleanup stays unless init hands back its own.
            if provision.cleanup.is_some() {
                callbacks.cleanup = provision.cleanup;
            }
        }
        Ok(())
    }

    /// Run the cleanup path and mark the component uninstalled.
    ///
    /// A no-op when already uninstalled. Dependencies are not touched. On
    /// failure the state is left as it was so the call can be retried.
    pub fn uninstall(&self) -> Result<()> {
        let state = self.state();
        if state == InstallState::Uninstalled {
            trace!("Component '{}' already uninstalled", self.name);
            return Ok(());
        }
        debug!("Uninstalling component '{}' (was {})", self.name, state);

        {
            let mut behavior = lock(&self.behavior);
            match &mut *behavior {
                Behavior::Instance(instance) => instance.clean()?,
                Behavior::Legacy(callbacks) => {
                    if let Some(cleanup) = callbacks.cleanup.as_mut() {
                        cleanup()?;
                    }
                }
            }
        }

        self.set_state(InstallState::Uninstalled);
        debug!("Component '{}' uninstalled", self.name);
        Ok(())
    }
}
