//! # Bootkit Registry
//!
//! Name to component table with register-once semantics. The registry is the
//! resolver for every install it drives, and supports bulk install and
//! uninstall by name (or of everything).
//!
//! A process-wide instance is available through [`Registry::global`] and the
//! free functions [`register`], [`must_register`], [`get`], [`install`] and
//! [`uninstall`]. Separate [`Registry`] values are handy in tests.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use log::{debug, info};

use crate::component::{Component, InstallContext, Resolve};
use crate::kernel::error::{Error, Result};
use crate::utils::{lock, read, write};

#[derive(Default)]
struct Table {
    /// Names in registration order
    order: Vec<String>,
    components: HashMap<String, Arc<Component>>,
}

/// Registry of components by name.
#[derive(Default)]
pub struct Registry {
    table: RwLock<Table>,
    /// Names of components installed through this registry, in completion order
    installed: Mutex<Vec<String>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register a component. Fails on an empty or already registered name;
    /// the first registration wins.
    pub fn register(&self, component: Arc<Component>) -> Result<()> {
        let name = component.name().to_string();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let mut table = write(&self.table);
        if table.components.contains_key(&name) {
            return Err(Error::AlreadyRegistered(name));
        }
        table.order.push(name.clone());
        table.components.insert(name.clone(), component);
        info!("Registered component '{}'", name);
        Ok(())
    }

    /// Like [`register`](Self::register) but panics on failure.
    pub fn must_register(&self, component: Arc<Component>) {
        if let Err(e) = self.register(component) {
            panic!("{}", e);
        }
    }

    /// Get a component by name.
    pub fn get(&self, name: &str) -> Result<Arc<Component>> {
        read(&self.table)
            .components
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        read(&self.table).components.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        read(&self.table).order.clone()
    }

    pub fn len(&self) -> usize {
        read(&self.table).order.len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.table).order.is_empty()
    }

    /// Names installed through this registry, in completion order.
    pub fn installed_order(&self) -> Vec<String> {
        lock(&self.installed).clone()
    }

    fn all(&self) -> Vec<Arc<Component>> {
        let table = read(&self.table);
        table
            .order
            .iter()
            .filter_map(|name| table.components.get(name).cloned())
            .collect()
    }

    fn lookup_all(&self, names: &[&str]) -> Result<Vec<Arc<Component>>> {
        names.iter().map(|name| self.get(name)).collect()
    }

    fn record_installed(&self, name: &str) {
        let mut installed = lock(&self.installed);
        if !installed.iter().any(|n| n == name) {
            installed.push(name.to_string());
        }
    }

    /// Install the named components, or every registered component (in
    /// registration order) when `names` is empty.
    ///
    /// The registry acts as the resolver regardless of the one set on `ctx`;
    /// the caller's after hook still runs. Stops at the first failure. With
    /// names given, every name is looked up before anything is installed.
    pub fn install(&self, ctx: &InstallContext<'_>, names: &[&str]) -> Result<()> {
        let targets = if names.is_empty() {
            self.all()
        } else {
            self.lookup_all(names)?
        };
        info!("Installing {} component(s)", targets.len());

        let caller_after = ctx.after;
        let record = |component: &Arc<Component>| {
            self.record_installed(component.name());
            if let Some(after) = caller_after {
                after(component);
            }
        };
        let scoped = InstallContext {
            resolver: self,
            after: Some(&record),
            ..*ctx
        };

        for component in &targets {
            component.install(&scoped)?;
        }
        Ok(())
    }

    /// Uninstall the named components, or every registered component when
    /// `names` is empty. Stops at the first failure.
    ///
    /// Uninstalling everything goes in reverse installation order, then
    /// through the components this registry never installed, in registration
    /// order.
    pub fn uninstall(&self, names: &[&str]) -> Result<()> {
        let targets = if names.is_empty() {
            self.teardown_order()
        } else {
            self.lookup_all(names)?
        };
        info!("Uninstalling {} component(s)", targets.len());

        for component in &targets {
            component.uninstall()?;
            lock(&self.installed).retain(|n| n != component.name());
        }
        Ok(())
    }

    fn teardown_order(&self) -> Vec<Arc<Component>> {
        let installed = self.installed_order();
        let mut ordered: Vec<Arc<Component>> = installed
            .iter()
            .rev()
            .filter_map(|name| self.get(name).ok())
            .collect();
        for component in self.all() {
            if !installed.iter().any(|n| n == component.name()) {
                ordered.push(component);
            }
        }
        debug!(
            "Teardown order: {:?}",
            ordered.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
        ordered
    }
}

impl Resolve for Registry {
    fn resolve(&self, name: &str) -> Result<Arc<Component>> {
        self.get(name)
    }
}

/// Register a component in the process-wide registry.
pub fn register(component: Arc<Component>) -> Result<()> {
    Registry::global().register(component)
}

/// Register a component in the process-wide registry, panicking on failure.
pub fn must_register(component: Arc<Component>) {
    Registry::global().must_register(component)
}

/// Look up a component in the process-wide registry.
pub fn get(name: &str) -> Result<Arc<Component>> {
    Registry::global().get(name)
}

/// Install components of the process-wide registry.
pub fn install(ctx: &InstallContext<'_>, names: &[&str]) -> Result<()> {
    Registry::global().install(ctx, names)
}

/// Uninstall components of the process-wide registry.
pub fn uninstall(names: &[&str]) -> Result<()> {
    Registry::global().uninstall(names)
}

// Test module declaration
#[cfg(test)]
mod tests;
