//! Demo component graph wired up by the `bootkit` binary.
//!
//! ```text
//! config-store <- db <- api
//!                 cache <-'
//! ```
//!
//! `config-store` and `cache` use the legacy callbacks, `db` and `api` are
//! capability instances configured from the `db` and `api` settings sections.
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use bootkit_core::component::{Component, InitContext, Instance, Provision, Validate};
use bootkit_core::config;
use bootkit_core::lifecycle::{Hook, StartStop};
use bootkit_core::{BootError, ExecContext, Registry, Result};

pub const CONFIG_STORE: &str = "config-store";
pub const DB: &str = "db";
pub const CACHE: &str = "cache";
pub const API: &str = "api";

/// Register the demo graph, in dependency-friendly order.
pub fn register_components(registry: &Registry) -> Result<()> {
    registry.register(config_store())?;
    registry.register(
        Component::builder(DB)
            .require(CONFIG_STORE)
            .instance(Database::default())
            .build(),
    )?;
    registry.register(cache())?;
    registry.register(
        Component::builder(API)
            .require_all([DB, CACHE])
            .instance(Api::default())
            .build(),
    )?;
    Ok(())
}

/// Static key/value settings shared with the other components.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    entries: BTreeMap<String, String>,
}

impl ConfigStore {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

fn config_store() -> Arc<Component> {
    Component::builder(CONFIG_STORE)
        .init(|_exec, _required| {
            let mut entries = BTreeMap::new();
            entries.insert("app.name".to_string(), "bootkit-demo".to_string());
            entries.insert("app.env".to_string(), "local".to_string());
            debug!("config-store loaded {} entries", entries.len());
            Ok(Provision::value(ConfigStore { entries }).with_cleanup(|| {
                println!("config-store: released");
                Ok(())
            }))
        })
        .build()
}

fn cache() -> Arc<Component> {
    Component::builder(CACHE)
        .init_ctx(|ctx| {
            ctx.exec.check_cancelled()?;
            if let Some(lifecycle) = ctx.lifecycle {
                lifecycle.append(Hook::from_fns(
                    ctx.component.name(),
                    |_exec: ExecContext| async move {
                        println!("cache: warmed");
                        Ok::<(), BootError>(())
                    },
                    |_exec: ExecContext| async move {
                        println!("cache: flushed");
                        Ok::<(), BootError>(())
                    },
                ));
            }
            Ok(())
        })
        .clean(|| {
            println!("cache: released");
            Ok(())
        })
        .build()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DbSettings {
    dsn: String,
    pool_size: u32,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            dsn: "memory://bootkit".to_string(),
            pool_size: 4,
        }
    }
}

#[derive(Debug, Default)]
pub struct Database {
    settings: DbSettings,
    app_name: Option<String>,
}

impl Database {
    pub fn dsn(&self) -> &str {
        &self.settings.dsn
    }
}

struct Pool {
    dsn: String,
    size: u32,
}

#[async_trait]
impl StartStop for Pool {
    async fn start(&self, ctx: &ExecContext) -> Result<()> {
        ctx.check_cancelled()?;
        println!("db: pool of {} opened on {}", self.size, self.dsn);
        Ok(())
    }

    async fn stop(&self, _ctx: &ExecContext) -> Result<()> {
        println!("db: pool closed");
        Ok(())
    }
}

impl Validate for Database {
    fn validate(&self) -> Result<()> {
        if self.settings.dsn.trim().is_empty() {
            return Err(BootError::Other("db: dsn must not be empty".to_string()));
        }
        if self.settings.pool_size == 0 {
            return Err(BootError::Other("db: pool_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Instance for Database {
    fn configure(&mut self, settings: &serde_json::Value) -> Result<()> {
        self.settings = config::decode(DB, settings)?;
        Ok(())
    }

    fn init(&mut self, ctx: &InitContext<'_>) -> Result<()> {
        ctx.exec.check_cancelled()?;
        self.app_name = ctx
            .dependency(CONFIG_STORE)
            .and_then(|store| store.value::<ConfigStore>())
            .and_then(|store| store.get("app.name").map(str::to_string));
        info!(
            "db configured for {} ({})",
            self.app_name.as_deref().unwrap_or("unknown app"),
            self.settings.dsn
        );
        Ok(())
    }

    fn clean(&mut self) -> Result<()> {
        println!("db: released");
        Ok(())
    }

    fn start_stop(&self) -> Option<Arc<dyn StartStop>> {
        Some(Arc::new(Pool {
            dsn: self.settings.dsn.clone(),
            size: self.settings.pool_size,
        }))
    }

    fn validator(&self) -> Option<&dyn Validate> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ApiSettings {
    port: u16,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Default)]
pub struct Api {
    settings: ApiSettings,
    backends: Vec<String>,
}

struct Listener {
    port: u16,
    backends: Vec<String>,
}

#[async_trait]
impl StartStop for Listener {
    async fn start(&self, ctx: &ExecContext) -> Result<()> {
        ctx.check_cancelled()?;
        println!(
            "api: listening on port {} (backends: {})",
            self.port,
            self.backends.join(", ")
        );
        Ok(())
    }

    async fn stop(&self, _ctx: &ExecContext) -> Result<()> {
        println!("api: stopped");
        Ok(())
    }
}

impl Instance for Api {
    fn configure(&mut self, settings: &serde_json::Value) -> Result<()> {
        self.settings = config::decode(API, settings)?;
        Ok(())
    }

    fn init(&mut self, ctx: &InitContext<'_>) -> Result<()> {
        if let Some(db) = ctx.dependency(DB) {
            if let Some(dsn) = db.with_instance(|d: &Database| d.dsn().to_string()) {
                debug!("api will use database at {}", dsn);
            }
        }
        self.backends = ctx.required.names().into_iter().map(String::from).collect();
        Ok(())
    }

    fn clean(&mut self) -> Result<()> {
        println!("api: released");
        Ok(())
    }

    fn start_stop(&self) -> Option<Arc<dyn StartStop>> {
        Some(Arc::new(Listener {
            port: self.settings.port,
            backends: self.backends.clone(),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
