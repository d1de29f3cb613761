//! # bootkit-core
//!
//! Dependency-ordered component bootstrapper. Components declare names and
//! dependencies, a [`Registry`] binds names to components, and each
//! component's install walks its dependencies first, detects cycles, and runs
//! either a legacy callback protocol or a capability-instance protocol.
pub mod component;
pub mod config;
pub mod kernel;
pub mod lifecycle;
pub mod registry;
pub(crate) mod utils;

// Re-export key public types/traits for easier use by the binary and callers
pub use component::{
    Component, ComponentBuilder, Dependencies, FailurePolicy, InitContext, InstallContext,
    InstallState, Instance, Provision, Resolve, Validate,
};
pub use config::{BootOptions, ConfigData, ConfigFormat, Unmarshal};
pub use kernel::error::Error as BootError;
pub use kernel::{Bootstrap, ExecContext, Result};
pub use lifecycle::{Hook, HookCollector, Lifecycle, StartStop};
pub use registry::Registry;
