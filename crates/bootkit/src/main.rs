mod cli;
mod demo;
mod settings;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, warn};

use bootkit_core::{Bootstrap, ConfigData, ConfigFormat, Registry};

use cli::{CliArgs, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    println!("Bootkit: dependency-ordered component bootstrapper");

    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let env = env_logger::Env::default().default_filter_or("warn");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Failed to initialize env_logger: {}", e);
    }

    println!("Initializing application...");

    let registry = Registry::global();
    if let Err(e) = demo::register_components(registry) {
        eprintln!("Fatal: Failed to register demo components: {}", e);
        return ExitCode::FAILURE;
    }

    let code = match args.command {
        Some(Commands::List {}) => {
            list(registry);
            ExitCode::SUCCESS
        }
        command => match settings::effective(&args.config, &args.overrides) {
            Ok(config) => match command {
                Some(Commands::Config { format }) => show_config(&config, format),
                Some(Commands::Install { names }) => {
                    run(registry, config, &names, args.run_for).await
                }
                _ => {
                    println!("No command specified, installing every component...");
                    run(registry, config, &[], args.run_for).await
                }
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    };

    println!("Shutting down application...");
    code
}

fn list(registry: &Registry) {
    println!("Registered components:");
    for name in registry.names() {
        let Ok(component) = registry.get(&name) else {
            continue;
        };
        let required = component.required_names();
        if required.is_empty() {
            println!("  - {}", name);
        } else {
            println!("  - {} (requires: {})", name, required.join(", "));
        }
    }
}

fn show_config(config: &ConfigData, format: ConfigFormat) -> ExitCode {
    match config.serialize(format) {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(registry: &Registry, config: ConfigData, names: &[String], run_for: u64) -> ExitCode {
    let boot = match Bootstrap::new(registry).with_config(config) {
        Ok(boot) => boot,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let installed = boot.install(&names);
    let order = registry.installed_order();
    if !order.is_empty() {
        println!("Installed: {}", order.join(", "));
    }

    let mut code = ExitCode::SUCCESS;
    match installed {
        Ok(()) => {
            if let Err(e) = serve(&boot, run_for).await {
                error!("Start/stop failed: {}", e);
                eprintln!("Error: {}", e);
                code = ExitCode::FAILURE;
            }
        }
        Err(e) => {
            eprintln!("Install failed: {}", e);
            code = ExitCode::FAILURE;
        }
    }

    // Tear down whatever did get installed, newest first. An empty list would
    // mean "everything", so skip the call when nothing was installed.
    let teardown: Vec<&str> = order.iter().rev().map(String::as_str).collect();
    if !teardown.is_empty() {
        if let Err(e) = boot.uninstall(&teardown) {
            eprintln!("Error during uninstall: {}", e);
            code = ExitCode::FAILURE;
        }
    }
    code
}

/// Start the collected hooks in order, optionally wait, then stop the
/// started ones in reverse order.
async fn serve(boot: &Bootstrap<'_>, run_for: u64) -> bootkit_core::Result<()> {
    let hooks = boot.hooks().take();
    let exec = boot.exec();
    let mut started = Vec::with_capacity(hooks.len());
    let mut outcome = Ok(());

    for hook in &hooks {
        info!("Starting '{}'", hook.name());
        if let Err(e) = hook.start(exec).await {
            outcome = Err(e);
            break;
        }
        started.push(hook);
    }

    if outcome.is_ok() && run_for > 0 {
        tokio::time::sleep(Duration::from_millis(run_for)).await;
    }

    for hook in started.iter().rev() {
        info!("Stopping '{}'", hook.name());
        if let Err(e) = hook.stop(exec).await {
            warn!("Stopping '{}' failed: {}", hook.name(), e);
            if outcome.is_ok() {
                outcome = Err(e);
            }
        }
    }
    outcome
}
