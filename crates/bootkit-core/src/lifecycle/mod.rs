//! # Bootkit Lifecycle Sink
//!
//! Components with long-running behavior publish a [`Hook`] while they
//! install. The engine only ever appends hooks to a [`Lifecycle`] sink; when
//! and in which order they run is up to whoever owns the sink.
//! [`HookCollector`] is the stock sink: it records hooks in append order.
use std::sync::Mutex;

pub mod hook;

pub use hook::{Hook, HookFuture, StartStop};

use crate::utils::lock;

/// Receiver of start/stop hooks.
pub trait Lifecycle: Send + Sync {
    fn append(&self, hook: Hook);
}

/// Lifecycle sink that stores hooks in the order they were appended.
#[derive(Debug, Default)]
pub struct HookCollector {
    hooks: Mutex<Vec<Hook>>,
}

impl HookCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected hooks, in append order.
    pub fn hooks(&self) -> Vec<Hook> {
        lock(&self.hooks).clone()
    }

    /// Names of the components that appended hooks, in append order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.hooks).iter().map(|h| h.name().to_string()).collect()
    }

    /// Remove and return every collected hook.
    pub fn take(&self) -> Vec<Hook> {
        std::mem::take(&mut *lock(&self.hooks))
    }

    pub fn len(&self) -> usize {
        lock(&self.hooks).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.hooks).is_empty()
    }
}

impl Lifecycle for HookCollector {
    fn append(&self, hook: Hook) {
        log::trace!("Collected lifecycle hook for '{}'", hook.name());
        lock(&self.hooks).push(hook);
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
