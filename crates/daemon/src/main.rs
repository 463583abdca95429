// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cogwheel daemon (cogd)
//!
//! Boots the orchestration engine, watches the workflows folder and
//! applies definition changes until a termination signal arrives.
//!
//! Architecture:
//! - Watcher task: owned by the notify adapter, posts events to a channel
//! - Main loop: drains watcher events serially and reconciles each one
//! - Scheduler driver: engine-owned task firing due triggers

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cog_adapters::{DirWatcher, NoopRunner, Recorded};
use cog_core::SystemClock;
use cog_definition::Settings;
use cog_engine::{Engine, EngineConfig, EngineDeps};
use cog_storage::{MemoryStore, Persistence};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::lifecycle::{Config, LifecycleError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings_override: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("cogd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("cogd {}", env!("CARGO_PKG_VERSION"));
                println!("Cogwheel daemon - watches a workflows folder and schedules workflow runs");
                println!();
                println!("USAGE:");
                println!("    cogd [SETTINGS_FILE]");
                println!();
                println!("SETTINGS_FILE defaults to ./cogwheel.toml (COGWHEEL_SETTINGS override).");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            other if !other.starts_with('-') => {
                settings_override = Some(PathBuf::from(other));
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: cogd [SETTINGS_FILE]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load(settings_override)?;
    let _log_guard = setup_logging(&config)?;

    info!(settings = %config.settings_path.display(), "Starting cogd");

    let lock_file = match lifecycle::acquire_lock(&config) {
        Ok(file) => file,
        Err(LifecycleError::LockFailed(_)) => {
            eprintln!("cogd is already running");
            if let Some(pid) = lifecycle::read_lock_pid(&config) {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let settings = Settings::load(&config.settings_path);
    if settings.workflows_folder.is_empty() {
        warn!("workflows_folder is empty; no definitions will be loaded or watched");
    }

    let store: Arc<dyn Persistence> = Arc::new(MemoryStore::new());
    if !settings.connection_string.is_empty() {
        info!("no external persistence wired; connection_string ignored, using in-memory store");
    }
    store.init()?;

    let runner = Arc::new(Recorded::new(NoopRunner::new(), Arc::clone(&store)));
    let engine = Engine::with_config(
        EngineDeps {
            settings: settings.clone(),
            store,
            runner,
            clock: SystemClock,
        },
        EngineConfig {
            timer_check: env::timer_check_interval(),
        },
    );

    engine.load_all();
    engine.run().await;

    let (event_tx, mut events) = mpsc::channel(256);
    let _watcher = match DirWatcher::spawn(Path::new(&settings.workflows_folder), event_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            error!(error = %e, "failed to start watcher; definition changes will not be picked up");
            None
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("Daemon ready");
    println!("READY");

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                engine.reconcile(event).await;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down");
                break;
            }
        }
    }

    // Scheduler first: no firing may race the per-workflow stops.
    engine.stop(true, false).await?;
    lifecycle::shutdown(&config, lock_file);
    info!("Daemon shutdown complete");
    Ok(())
}

/// Route tracing output to the daemon log file.
fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    std::fs::create_dir_all(&config.state_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = tracing_subscriber::EnvFilter::try_from_env("COGWHEEL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
