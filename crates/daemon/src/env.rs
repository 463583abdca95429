// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Where cogd keeps its pid file and log.
///
/// An explicit `COGWHEEL_STATE_DIR` is used as-is. Otherwise a
/// `cogwheel` directory is placed under the XDG state home, which
/// itself defaults to `~/.local/state`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("COGWHEEL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let state_home = std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".local/state"))
        })
        .map_err(|_| LifecycleError::NoStateDir)?;
    Ok(state_home.join("cogwheel"))
}

/// Settings document path: COGWHEEL_SETTINGS > ./cogwheel.toml
pub fn default_settings_path() -> PathBuf {
    std::env::var("COGWHEEL_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("cogwheel.toml"))
}

/// Scheduler driver resolution (default 500ms, COGWHEEL_TIMER_CHECK_MS override)
pub fn timer_check_interval() -> Duration {
    std::env::var("COGWHEEL_TIMER_CHECK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(500))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
