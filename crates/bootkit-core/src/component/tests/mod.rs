#![cfg(test)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::component::{Component, ComponentBuilder, Provision, Resolve};
use crate::kernel::error::Error;

mod install_tests;

/// Shared event log, as used across the test modules.
pub(super) type Tracker = Arc<Mutex<Vec<String>>>;

pub(super) fn tracker() -> Tracker {
    Arc::new(Mutex::new(Vec::new()))
}

pub(super) fn events(tracker: &Tracker) -> Vec<String> {
    tracker.lock().unwrap().clone()
}

/// Legacy component whose init records `init:<name>`, stores `<name>-value`
/// and returns a cleanup recording `clean:<name>`.
pub(super) fn tracked(name: &str, tracker: &Tracker) -> ComponentBuilder {
    let component_name = name.to_string();
    let tracker = tracker.clone();
    Component::builder(name).init(move |_exec, _required| {
        tracker.lock().unwrap().push(format!("init:{}", component_name));
        let cleanup_tracker = tracker.clone();
        let cleanup_name = component_name.clone();
        Ok(Provision::value(format!("{}-value", component_name)).with_cleanup(move || {
            cleanup_tracker.lock().unwrap().push(format!("clean:{}", cleanup_name));
            Ok(())
        }))
    })
}

/// Resolver over a fixed set of components.
pub(super) fn resolver_for(components: &[&Arc<Component>]) -> impl Resolve + use<> {
    let table: HashMap<String, Arc<Component>> = components
        .iter()
        .map(|c| (c.name().to_string(), Arc::clone(c)))
        .collect();
    move |name: &str| {
        table
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotRegistered(name.to_string()))
    }
}
