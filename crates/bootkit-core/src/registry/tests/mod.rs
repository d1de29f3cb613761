#![cfg(test)]

use std::sync::{Arc, Mutex};

use crate::component::{Component, ComponentBuilder, Provision};


type Tracker = Arc<Mutex<Vec<String>>>;

fn tracker() -> Tracker {
    Arc::new(Mutex::new(Vec::new()))
}

fn events(tracker: &Tracker) -> Vec<String> {
    tracker.lock().unwrap().clone()
}

/// Legacy component logging `init:<name>` and `clean:<name>`.
fn logged(name: &str, tracker: &Tracker) -> ComponentBuilder {
    let init_name = name.to_string();
    let init_tracker = tracker.clone();
    let clean_name = name.to_string();
    let clean_tracker = tracker.clone();
    Component::builder(name)
        .init(move |_, _| {
            init_tracker.lock().unwrap().push(format!("init:{}", init_name));
            Ok(Provision::empty())
        })
        .clean(move || {
            clean_tracker.lock().unwrap().push(format!("clean:{}", clean_name));
            Ok(())
        })
}
