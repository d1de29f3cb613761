use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{events, resolver_for, tracked, tracker};
use crate::component::{Component, FailurePolicy, InstallContext, InstallState, Provision};
use crate::kernel::context::ExecContext;
use crate::kernel::error::Error;
use crate::lifecycle::{Hook, HookCollector};

#[test]
fn test_install_single_legacy_component_stores_value() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    db.install(&InstallContext::new(&exec, &hooks)).expect("install db");

    assert_eq!(db.state(), InstallState::Installed);
    assert_eq!(events(&log), vec!["init:db"]);
    assert_eq!(db.value::<String>().as_deref().map(String::as_str), Some("db-value"));
    // Wrong type yields nothing rather than panicking
    assert!(db.value::<u32>().is_none());
}

#[test]
fn test_install_twice_is_a_noop() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks);

    db.install(&ctx).expect("first install");
    db.install(&ctx).expect("second install");

    assert_eq!(events(&log), vec!["init:db"]);
    assert!(db.is_installed());
}

#[test]
fn test_dependency_installs_before_dependent() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let api = tracked("api", &log).require("db").build();
    let resolver = resolver_for(&[&db, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    api.install(&ctx).expect("install api");

    assert_eq!(events(&log), vec!["init:db", "init:api"]);
    assert!(db.is_installed());
    assert!(api.is_installed());
    assert_eq!(api.value::<String>().as_deref().map(String::as_str), Some("api-value"));
}

#[test]
fn test_shared_dependencies_follow_declaration_order_and_run_once() {
    let log = tracker();
    let config = tracked("config", &log).build();
    let db = tracked("db", &log).require("config").build();
    let cache = tracked("cache", &log).require("config").build();
    let api = tracked("api", &log).require("db").require("cache").build();
    let resolver = resolver_for(&[&config, &db, &cache, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    api.install(&ctx).expect("install api");

    assert_eq!(
        events(&log),
        vec!["init:config", "init:db", "init:cache", "init:api"]
    );
}

#[test]
fn test_two_component_cycle_is_detected() {
    let log = tracker();
    let a = tracked("a", &log).require("b").build();
    let b = tracked("b", &log).require("a").build();
    let resolver = resolver_for(&[&a, &b]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    let err = a.install(&ctx).unwrap_err();
    assert!(err.is_circular_dependency());
    assert_eq!(err.component_name(), Some("a"));
    assert_eq!(err.to_string(), "Circular dependency detected for component 'a'");
    assert!(events(&log).is_empty(), "no init may run when a cycle exists");

    // The default policy restores both components.
    assert_eq!(a.state(), InstallState::Uninitialized);
    assert_eq!(b.state(), InstallState::Uninitialized);

    let err = b.install(&ctx).unwrap_err();
    assert_eq!(err.component_name(), Some("b"));
    assert!(events(&log).is_empty());
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let log = tracker();
    let selfish = tracked("selfish", &log).require("selfish").build();
    let resolver = resolver_for(&[&selfish]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    let err = selfish.install(&ctx).unwrap_err();
    assert!(matches!(err, Error::CircularDependency(ref name) if name == "selfish"));
    assert!(events(&log).is_empty());
}

#[test]
fn test_unknown_dependency_runs_no_init() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let api = tracked("api", &log).require("db").require("missing").build();
    let resolver = resolver_for(&[&db, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    let err = api.install(&ctx).unwrap_err();

    assert!(matches!(err, Error::NotRegistered(ref name) if name == "missing"));
    assert!(events(&log).is_empty(), "resolution happens before any dependency installs");
    assert_eq!(db.state(), InstallState::Uninitialized);
    assert_eq!(api.state(), InstallState::Uninitialized);
}

#[test]
fn test_install_without_registry_cannot_resolve_dependencies() {
    let log = tracker();
    let api = tracked("api", &log).require("db").build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    let err = api.install(&InstallContext::new(&exec, &hooks)).unwrap_err();

    assert!(matches!(err, Error::NotRegistered(ref name) if name == "db"));
}

fn flaky(name: &str, fail: Arc<AtomicBool>, calls: Arc<AtomicUsize>) -> Arc<Component> {
    Component::builder(name)
        .init(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            if fail.load(Ordering::SeqCst) {
                Err("boom".into())
            } else {
                Ok(Provision::value(7u32))
            }
        })
        .build()
}

#[test]
fn test_failed_init_is_returned_verbatim_and_can_be_retried() {
    let fail = Arc::new(AtomicBool::new(true));
    let calls = Arc::new(AtomicUsize::new(0));
    let component = flaky("flaky", fail.clone(), calls.clone());
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks);

    let err = component.install(&ctx).unwrap_err();
    assert!(matches!(err, Error::Other(ref msg) if msg == "boom"));
    assert_eq!(component.state(), InstallState::Uninitialized);
    assert!(component.raw_value().is_none(), "no value is stored on failure");

    fail.store(false, Ordering::SeqCst);
    component.install(&ctx).expect("retry succeeds");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(component.value::<u32>().map(|v| *v), Some(7));
}

#[test]
fn test_poison_policy_keeps_failed_component_installing() {
    let fail = Arc::new(AtomicBool::new(true));
    let calls = Arc::new(AtomicUsize::new(0));
    let component = flaky("poisoned", fail.clone(), calls.clone());
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).on_failure(FailurePolicy::Poison);

    component.install(&ctx).unwrap_err();
    assert_eq!(component.state(), InstallState::Installing);

    fail.store(false, Ordering::SeqCst);
    let err = component.install(&ctx).unwrap_err();
    assert!(err.is_circular_dependency());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dependency_failure_propagates_and_completed_siblings_stay_installed() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let broken = Component::builder("broken")
        .init(|_, _| Err("broken init".into()))
        .build();
    let api = tracked("api", &log).require("db").require("broken").build();
    let resolver = resolver_for(&[&db, &broken, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks).with_resolver(&resolver);

    let err = api.install(&ctx).unwrap_err();

    assert!(matches!(err, Error::Other(ref msg) if msg == "broken init"));
    assert_eq!(events(&log), vec!["init:db"]);
    assert!(db.is_installed(), "completed siblings are not rolled back");
    assert_eq!(broken.state(), InstallState::Uninitialized);
    assert_eq!(api.state(), InstallState::Uninitialized);
}

#[test]
fn test_context_init_runs_before_value_init_and_sees_everything() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let ctx_log = log.clone();
    let value_log = log.clone();
    let api = Component::builder("api")
        .require("db")
        .init_ctx(move |init| {
            assert_eq!(init.component.name(), "api");
            assert!(init.lifecycle.is_some(), "legacy context init gets the sink");
            assert!(init.dependency("db").map(|d| d.is_installed()).unwrap_or(false));
            assert_eq!(init.component.state(), InstallState::Installing);
            ctx_log.lock().unwrap().push("init_ctx:api".to_string());
            Ok(())
        })
        .init(move |_exec, required| {
            value_log.lock().unwrap().push(format!("init:api deps={:?}", required.names()));
            Ok(Provision::value("ready"))
        })
        .build();
    let resolver = resolver_for(&[&db, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    api.install(&InstallContext::new(&exec, &hooks).with_resolver(&resolver))
        .expect("install api");

    assert_eq!(
        events(&log),
        vec!["init:db", "init_ctx:api", "init:api deps=[\"db\"]"]
    );
    assert_eq!(api.value::<&str>().map(|v| *v), Some("ready"));
}

#[test]
fn test_failing_context_init_skips_value_init() {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let component = Component::builder("svc")
        .init_ctx(|_| Err("ctx init failed".into()))
        .init(move |_, _| {
            flag.store(true, Ordering::SeqCst);
            Ok(Provision::empty())
        })
        .build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    let err = component.install(&InstallContext::new(&exec, &hooks)).unwrap_err();

    assert_eq!(err.to_string(), "Error: ctx init failed");
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_legacy_init_can_append_lifecycle_hooks() {
    let component = Component::builder("server")
        .init_with_lifecycle(|_exec, lifecycle, _required| {
            lifecycle.append(Hook::from_fns(
                "server",
                |_| async { Ok::<(), Error>(()) },
                |_| async { Ok::<(), Error>(()) },
            ));
            Ok(Provision::empty())
        })
        .build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    component.install(&InstallContext::new(&exec, &hooks)).expect("install server");

    assert_eq!(hooks.names(), vec!["server"]);
}

#[test]
fn test_after_hook_sees_each_installed_component_in_order() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let api = tracked("api", &log).require("db").build();
    let resolver = resolver_for(&[&db, &api]);
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let seen = tracker();
    let seen_in_hook = seen.clone();
    let after = move |component: &Arc<Component>| {
        seen_in_hook.lock().unwrap().push(component.name().to_string());
    };
    let ctx = InstallContext::new(&exec, &hooks)
        .with_resolver(&resolver)
        .after_install(&after);

    api.install(&ctx).expect("install api");
    api.install(&ctx).expect("second install is a no-op");

    assert_eq!(events(&seen), vec!["db", "api"]);
}

#[test]
fn test_after_hook_not_called_on_failure() {
    let seen = tracker();
    let seen_in_hook = seen.clone();
    let after = move |component: &Arc<Component>| {
        seen_in_hook.lock().unwrap().push(component.name().to_string());
    };
    let broken = Component::builder("broken")
        .init(|_, _| Err("nope".into()))
        .build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();

    broken
        .install(&InstallContext::new(&exec, &hooks).after_install(&after))
        .unwrap_err();

    assert!(events(&seen).is_empty());
}

#[test]
fn test_reinstall_after_uninstall_runs_init_again() {
    let log = tracker();
    let db = tracked("db", &log).build();
    let exec = ExecContext::new();
    let hooks = HookCollector::new();
    let ctx = InstallContext::new(&exec, &hooks);

    db.install(&ctx).unwrap();
    db.uninstall().unwrap();
    db.install(&ctx).unwrap();

    assert_eq!(events(&log), vec!["init:db", "clean:db", "init:db"]);
    assert!(db.is_installed());
}

#[test]
fn test_cancelled_context_is_reported_by_callbacks() {
    let component = Component::builder("patient")
        .init(|exec, _| {
            exec.check_cancelled()?;
            Ok(Provision::empty())
        })
        .build();
    let exec = ExecContext::new();
    exec.cancel();
    let hooks = HookCollector::new();

    let err = component.install(&InstallContext::new(&exec, &hooks)).unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(component.state(), InstallState::Uninitialized);
}
