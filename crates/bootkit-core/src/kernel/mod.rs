//! # Bootkit Kernel
//!
//! Shared foundations used by every other module:
//!
//! - **Error Handling**: the crate-wide [`Error`](error::Error) enum and
//!   [`Result`](error::Result) alias in the `error` submodule.
//! - **Execution Context**: [`ExecContext`](context::ExecContext), the
//!   cancellation-aware context handed to init callbacks and start/stop hooks.
//! - **Bootstrap**: [`Bootstrap`](bootstrap::Bootstrap) wires a registry,
//!   a settings source and a hook collector together for the common
//!   "install everything, later tear it down" flow.
//! - **Core Constants**: the `constants` submodule.
pub mod bootstrap;
pub mod constants;
pub mod context;
pub mod error;

pub use bootstrap::Bootstrap;
pub use context::ExecContext;
pub use error::{Error, Result};
// Test module declaration
#[cfg(test)]
mod tests;
