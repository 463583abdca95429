// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: paths, single-instance lock, teardown.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/cogwheel)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the engine settings document
    pub settings_path: PathBuf,
}

impl Config {
    /// Resolve daemon paths. One daemon per state directory; the lock
    /// below enforces it.
    pub fn load(settings_override: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        Ok(Self {
            lock_path: state_dir.join("cogd.pid"),
            log_path: state_dir.join("cogd.log"),
            settings_path: settings_override.unwrap_or_else(crate::env::default_settings_path),
            state_dir,
        })
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Acquire the single-instance lock and write our PID into it.
///
/// Opened without truncation so a failed attempt cannot wipe the running
/// daemon's PID; truncated only once the lock is held.
pub fn acquire_lock(config: &Config) -> Result<File, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// PID recorded in the lock file, for already-running diagnostics.
pub fn read_lock_pid(config: &Config) -> Option<String> {
    std::fs::read_to_string(&config.lock_path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Remove the PID file. The lock itself is released when the file
/// handle drops.
pub fn shutdown(config: &Config, lock_file: File) {
    drop(lock_file);
    if config.lock_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.lock_path) {
            tracing::warn!(error = %e, "failed to remove PID file");
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
