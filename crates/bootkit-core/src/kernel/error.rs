//! # Bootkit Kernel Errors
//!
//! Defines [`Error`], the error type returned by every registry, install and
//! uninstall operation, together with the [`Result`] alias used throughout the
//! crate.
//!
//! Errors fall into four groups:
//! - registration errors ([`Error::EmptyName`], [`Error::AlreadyRegistered`]),
//! - resolution errors ([`Error::NotRegistered`]),
//! - cycle errors ([`Error::CircularDependency`]),
//! - protocol errors raised by user callbacks, which travel through the engine
//!   unchanged ([`Error::Config`], [`Error::Callback`], [`Error::Cancelled`],
//!   [`Error::Other`]).
use std::error::Error as StdError;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;

/// Custom error type for the bootkit engine
#[derive(Debug, ThisError)]
pub enum Error {
    /// A component with an empty name was offered for registration.
    #[error("Component name must not be empty")]
    EmptyName,

    /// A component with the same name is already in the registry.
    #[error("Component '{0}' is already registered")]
    AlreadyRegistered(String),

    /// No component is registered under the given name.
    #[error("Component '{0}' is not registered")]
    NotRegistered(String),

    /// The named component was re-entered while it was still installing.
    #[error("Circular dependency detected for component '{0}'")]
    CircularDependency(String),

    /// Settings could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The execution context was cancelled before a callback finished.
    #[error("Execution context was cancelled")]
    Cancelled,

    /// Failure reported by a user callback, kept as-is.
    #[error(transparent)]
    Callback(Box<dyn StdError + Send + Sync>),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Wrap an arbitrary error coming out of user code.
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error::Callback(err.into())
    }

    /// Returns true if this error reports a dependency cycle.
    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Error::CircularDependency(_))
    }

    /// The component name carried by registration, resolution and cycle errors.
    pub fn component_name(&self) -> Option<&str> {
        match self {
            Error::AlreadyRegistered(name)
            | Error::NotRegistered(name)
            | Error::CircularDependency(name) => Some(name),
            _ => None,
        }
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
