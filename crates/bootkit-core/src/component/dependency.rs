use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::component::Component;
use crate::kernel::error::{Error, Result};
use crate::utils::lock;

/// Name to component lookup used while resolving dependencies.
pub trait Resolve: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Arc<Component>>;
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Result<Arc<Component>> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<Arc<Component>> {
        self(name)
    }
}

/// Resolver for components that were never registered: nothing resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unregistered;

impl Resolve for Unregistered {
    fn resolve(&self, name: &str) -> Result<Arc<Component>> {
        Err(Error::NotRegistered(name.to_string()))
    }
}

/// Resolved dependencies of a component, in declaration order.
#[derive(Clone, Default)]
pub struct Dependencies {
    entries: Vec<Arc<Component>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, component: Arc<Component>) {
        self.entries.push(component);
    }

    /// Get a dependency by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Component>> {
        self.entries.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Component>> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a Arc<Component>;
    type IntoIter = std::slice::Iter<'a, Arc<Component>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Component {
    /// Resolve the declared dependency names into components.
    ///
    /// Runs at most once successfully: when every declared name is already
    /// resolved the stored set is returned as-is. The first unknown name
    /// aborts resolution and nothing is recorded.
    pub fn resolve_required(&self, resolver: &dyn Resolve) -> Result<Dependencies> {
        {
            let required = lock(&self.required);
            if required.len() == self.required_names.len() {
                return Ok(required.clone());
            }
        }

        let mut resolved = Dependencies::new();
        for name in &self.required_names {
            trace!("Resolving dependency '{}' of component '{}'", name, self.name);
            resolved.push(resolver.resolve(name)?);
        }

        *lock(&self.required) = resolved.clone();
        Ok(resolved)
    }
}
