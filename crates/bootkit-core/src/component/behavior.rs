//! The two initialization protocols a component can follow.
//!
//! A component either carries [`LegacyCallbacks`] (closures set on the
//! builder) or a boxed [`Instance`] (a user type implementing init/clean and
//! optionally exposing start/stop and validation). The choice is fixed when the
//! component is built and is represented by the [`Behavior`] enum.
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::component::dependency::Dependencies;
use crate::kernel::context::ExecContext;
use crate::kernel::error::Result;
use crate::lifecycle::{Lifecycle, StartStop};

/// Opaque, use-case specific payload produced by a legacy init callback.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Cleanup callback. It may run again if a previous attempt failed.
pub type CleanFn = Box<dyn FnMut() -> Result<()> + Send>;

/// Value-returning legacy init callback.
pub type InitFn =
    Box<dyn FnMut(&ExecContext, &dyn Lifecycle, &Dependencies) -> Result<Provision> + Send>;

/// Context-based legacy init callback.
pub type InitCtxFn = Box<dyn FnMut(&InitContext<'_>) -> Result<()> + Send>;

/// What a value-returning init callback hands back on success.
#[derive(Default)]
pub struct Provision {
    pub(crate) value: Option<Value>,
    pub(crate) cleanup: Option<CleanFn>,
}

impl Provision {
    /// Nothing to store and nothing to clean up.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store `value` on the component once installed.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Some(Arc::new(value)),
            cleanup: None,
        }
    }

    /// Attach the cleanup that uninstall will run.
    pub fn with_cleanup<F>(mut self, cleanup: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        self.cleanup = Some(Box::new(cleanup));
        self
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Debug for Provision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provision")
            .field("has_value", &self.value.is_some())
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Everything an init call gets to see.
pub struct InitContext<'a> {
    /// The execution context of the current install run.
    pub exec: &'a ExecContext,
    /// The component being installed.
    pub component: &'a Arc<Component>,
    /// Its resolved dependencies, already installed.
    pub required: &'a Dependencies,
    /// The lifecycle sink. Only the legacy context-based init receives one;
    /// instances publish hooks through [`Instance::start_stop`] instead.
    pub lifecycle: Option<&'a dyn Lifecycle>,
}

impl<'a> InitContext<'a> {
    /// Look up one of the resolved dependencies by name.
    pub fn dependency(&self, name: &str) -> Option<&'a Arc<Component>> {
        self.required.get(name)
    }
}

/// Validation capability of an [`Instance`].
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Capability-based component implementation.
///
/// `init` and `clean` are mandatory. Start/stop and validation are optional
/// capabilities, advertised by overriding [`start_stop`](Self::start_stop) and
/// [`validator`](Self::validator).
pub trait Instance: Any + Send {
    /// Apply the settings section named after the component. Called before
    /// `init`, only when the settings source has a section for it.
    fn configure(&mut self, _settings: &serde_json::Value) -> Result<()> {
        Ok(())
    }

    fn init(&mut self, ctx: &InitContext<'_>) -> Result<()>;

    fn clean(&mut self) -> Result<()>;

    /// Long-running behavior to register with the lifecycle sink.
    fn start_stop(&self) -> Option<Arc<dyn StartStop>> {
        None
    }

    /// Validation to run after a successful `init`.
    fn validator(&self) -> Option<&dyn Validate> {
        None
    }

    /// Access to the concrete type, for [`Component::with_instance`].
    fn as_any(&self) -> &dyn Any;
}

/// Legacy callbacks. Any subset may be set; unset ones are skipped.
#[derive(Default)]
pub struct LegacyCallbacks {
    pub(crate) init_ctx: Option<InitCtxFn>,
    pub(crate) init: Option<InitFn>,
    pub(crate) cleanup: Option<CleanFn>,
}

impl LegacyCallbacks {
    pub fn is_empty(&self) -> bool {
        self.init_ctx.is_none() && self.init.is_none() && self.cleanup.is_none()
    }
}

impl fmt::Debug for LegacyCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyCallbacks")
            .field("init_ctx", &self.init_ctx.is_some())
            .field("init", &self.init.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// How a component installs and uninstalls itself.
pub enum Behavior {
    Legacy(LegacyCallbacks),
    Instance(Box<dyn Instance>),
}

impl Behavior {
    pub fn is_instance(&self) -> bool {
        matches!(self, Behavior::Instance(_))
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Legacy(LegacyCallbacks::default())
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Behavior::Legacy(callbacks) => f.debug_tuple("Legacy").field(callbacks).finish(),
            Behavior::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}
