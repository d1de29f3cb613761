use std::sync::Arc;

use log::warn;

use crate::component::Component;
use crate::component::behavior::{Behavior, InitContext, Instance, LegacyCallbacks, Provision};
use crate::component::dependency::Dependencies;
use crate::kernel::context::ExecContext;
use crate::kernel::error::Result;
use crate::lifecycle::Lifecycle;

/// Fluent configuration surface for a [`Component`].
///
/// Every method is chainable and order-insensitive. [`build`](Self::build)
/// freezes the result: dependency names and callbacks cannot change after it.
pub struct ComponentBuilder {
    name: String,
    required_names: Vec<String>,
    legacy: LegacyCallbacks,
    instance: Option<Box<dyn Instance>>,
}

impl ComponentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_names: Vec::new(),
            legacy: LegacyCallbacks::default(),
            instance: None,
        }
    }

    /// Declare a dependency. Repeating a name is a no-op.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required_names.contains(&name) {
            self.required_names.push(name);
        }
        self
    }

    /// Declare several dependencies at once.
    pub fn require_all<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |builder, name| builder.require(name))
    }

    /// Value-returning init that does not need the lifecycle sink.
    pub fn init<F>(mut self, mut init: F) -> Self
    where
        F: FnMut(&ExecContext, &Dependencies) -> Result<Provision> + Send + 'static,
    {
        self.legacy.init = Some(Box::new(
            move |exec: &ExecContext, _lifecycle: &dyn Lifecycle, required: &Dependencies| {
                init(exec, required)
            },
        ));
        self
    }

    /// Value-returning init with access to the lifecycle sink.
    pub fn init_with_lifecycle<F>(mut self, init: F) -> Self
    where
        F: FnMut(&ExecContext, &dyn Lifecycle, &Dependencies) -> Result<Provision> + Send + 'static,
    {
        self.legacy.init = Some(Box::new(init));
        self
    }

    /// Context-based init returning only success or failure.
    pub fn init_ctx<F>(mut self, init: F) -> Self
    where
        F: FnMut(&InitContext<'_>) -> Result<()> + Send + 'static,
    {
        self.legacy.init_ctx = Some(Box::new(init));
        self
    }

    /// Cleanup for the legacy protocol. A cleanup returned by a
    /// value-returning init replaces it.
    pub fn clean<F>(mut self, cleanup: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        self.legacy.cleanup = Some(Box::new(cleanup));
        self
    }

    /// Use a capability instance. Its `init` and `clean` become the install
    /// and cleanup paths and any legacy callbacks are ignored.
    pub fn instance<I: Instance>(mut self, instance: I) -> Self {
        self.instance = Some(Box::new(instance));
        self
    }

    /// Freeze the configuration into a shareable component.
    pub fn build(self) -> Arc<Component> {
        let behavior = match self.instance {
            Some(instance) => {
                if !self.legacy.is_empty() {
                    warn!(
                        "Component '{}' has both an instance and legacy callbacks; the callbacks are ignored",
                        self.name
                    );
                }
                Behavior::Instance(instance)
            }
            None => Behavior::Legacy(self.legacy),
        };
        Arc::new(Component::from_parts(self.name, self.required_names, behavior))
    }
}
