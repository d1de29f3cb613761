use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::kernel::error::{Error, Result};
use crate::utils::{read, write};

/// Execution context threaded through every install and every start/stop hook.
///
/// Cloning is cheap and clones share the same cancellation flag and data map,
/// so a context handed to a hook observes a later [`cancel`](Self::cancel).
/// The engine itself never checks cancellation; callbacks are expected to.
#[derive(Clone, Default)]
pub struct ExecContext {
    cancelled: Arc<AtomicBool>,
    shared_data: Arc<RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>>,
}

impl ExecContext {
    /// Create a fresh, uncancelled context with no shared data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to everything holding this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`Error::Cancelled`] once the context has been cancelled.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Set a shared data value
    pub fn set_data<T: Any + Send + Sync>(&self, key: &str, value: T) {
        write(&self.shared_data).insert(key.to_string(), Arc::new(value));
    }

    /// Get a shared data value
    pub fn get_data<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let data = read(&self.shared_data).get(key).cloned()?;
        data.downcast::<T>().ok()
    }

    /// Remove a shared data value, returning whether it was present.
    pub fn remove_data(&self, key: &str) -> bool {
        write(&self.shared_data).remove(key).is_some()
    }
}

impl fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = read(&self.shared_data).keys().cloned().collect();
        keys.sort();
        f.debug_struct("ExecContext")
            .field("cancelled", &self.is_cancelled())
            .field("data_keys", &keys)
            .finish()
    }
}
