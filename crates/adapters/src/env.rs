// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

/// Window within which repeated change events for the same definition
/// file are coalesced (default: 250ms). Editors that save in multiple
/// syscalls produce bursts the reconciler should see once.
pub fn debounce_window() -> Duration {
    std::env::var("COGWHEEL_DEBOUNCE_MS")
        .ok()
        .and_then(|ms| ms.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(250))
}
