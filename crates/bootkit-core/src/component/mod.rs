//! # Bootkit Components
//!
//! A [`Component`] is a named, dependency-aware unit that can be installed and
//! uninstalled. It is configured once through a [`ComponentBuilder`] and is
//! frozen afterwards: its name, declared dependency names and
//! [`Behavior`] never change. What does change, through explicit `install` and
//! `uninstall` calls, is its [`InstallState`], its resolved
//! [`Dependencies`], and (for legacy components) its stored value.
//!
//! ## Submodules
//!
//! - **[`behavior`]**: the legacy callback protocol and the [`Instance`] protocol.
//! - **[`builder`]**: the fluent [`ComponentBuilder`].
//! - **[`dependency`]**: name resolution ([`Resolve`]) and [`Dependencies`].
//! - **[`install`]**: the install/uninstall engine and its [`InstallContext`].
//! - **[`state`]**: the [`InstallState`] machine.
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

pub mod behavior;
pub mod builder;
pub mod dependency;
pub mod install;
pub mod state;

pub use behavior::{
    Behavior, CleanFn, InitContext, InitCtxFn, InitFn, Instance, LegacyCallbacks, Provision,
    Validate, Value,
};
pub use builder::ComponentBuilder;
pub use dependency::{Dependencies, Resolve, Unregistered};
pub use install::{AfterHook, FailurePolicy, InstallContext};
pub use state::InstallState;

use crate::utils::{lock, try_lock};

/// A named, installable unit with declared dependencies.
pub struct Component {
    name: String,
    required_names: Vec<String>,
    required: Mutex<Dependencies>,
    behavior: Mutex<Behavior>,
    is_instance: bool,
    value: Mutex<Option<Value>>,
    state: Mutex<InstallState>,
}

impl Component {
    /// Start configuring a component named `name`.
    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder::new(name)
    }

    pub(crate) fn from_parts(name: String, required_names: Vec<String>, behavior: Behavior) -> Self {
        Self {
            name,
            required_names,
            required: Mutex::new(Dependencies::new()),
            is_instance: behavior.is_instance(),
            behavior: Mutex::new(behavior),
            value: Mutex::new(None),
            state: Mutex::new(InstallState::Uninitialized),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependency names, in declaration order.
    pub fn required_names(&self) -> &[String] {
        &self.required_names
    }

    /// Dependencies resolved so far (empty until the first install resolves them).
    pub fn dependencies(&self) -> Dependencies {
        lock(&self.required).clone()
    }

    pub fn state(&self) -> InstallState {
        *lock(&self.state)
    }

    pub fn is_installed(&self) -> bool {
        self.state().is_installed()
    }

    pub(crate) fn set_state(&self, state: InstallState) {
        *lock(&self.state) = state;
    }

    /// Whether this component follows the capability-instance protocol.
    pub fn has_instance(&self) -> bool {
        self.is_instance
    }

    /// The value stored by a legacy value-returning init, if any.
    pub fn raw_value(&self) -> Option<Value> {
        lock(&self.value).clone()
    }

    /// The stored value, downcast to `T`.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.raw_value()?.downcast::<T>().ok()
    }

    /// Run `f` against the capability instance if it is a `T`.
    ///
    /// Returns `None` while this component's own init or clean is running,
    /// since the instance is mutably borrowed by that protocol.
    pub fn with_instance<T, R, F>(&self, f: F) -> Option<R>
    where
        T: Instance,
        F: FnOnce(&T) -> R,
    {
        let behavior = try_lock(&self.behavior)?;
        match &*behavior {
            Behavior::Instance(instance) => instance.as_any().downcast_ref::<T>().map(f),
            Behavior::Legacy(_) => None,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("required_names", &self.required_names)
            .field("state", &self.state())
            .finish()
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
