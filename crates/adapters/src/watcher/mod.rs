// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflows-folder watcher using file notifications.
//!
//! Watches one directory, non-recursively, for `*.xml` definition files
//! and posts [`WatchEvent`]s onto a single-consumer channel. The engine
//! drains that channel serially, so three racing notify callbacks become
//! one ordered event stream.

use crate::env;
use cog_core::WatchEvent;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from starting the watcher
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Handle owning the underlying notify watcher.
///
/// Dropping it stops the watch; keep it alive for the daemon's lifetime.
pub struct DirWatcher {
    _watcher: RecommendedWatcher,
}

impl DirWatcher {
    /// Start watching `folder` for definition file changes.
    ///
    /// Events are delivered on `tx`; if the receiver is gone the engine
    /// is shutting down and events are silently dropped.
    pub fn spawn(folder: &Path, tx: mpsc::Sender<WatchEvent>) -> Result<DirWatcher, WatchError> {
        let mut debounce = Debounce::new(env::debounce_window());
        let mut watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for ev in classify(&event) {
                        if debounce.should_deliver(&ev, Instant::now()) {
                            let _ = tx.blocking_send(ev);
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "watcher error"),
            },
        )
        .map_err(|source| WatchError::Watch {
            path: folder.to_path_buf(),
            source,
        })?;

        watcher
            .watch(folder, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Watch {
                path: folder.to_path_buf(),
                source,
            })?;

        tracing::info!(folder = %folder.display(), "watching workflows folder");
        Ok(DirWatcher { _watcher: watcher })
    }
}

/// Map one notify event to workflow watch events.
///
/// Renames arrive as `Modify(Name)` with one path per side; whether the
/// path still exists decides which side this is.
pub(crate) fn classify(event: &notify::Event) -> Vec<WatchEvent> {
    use notify::event::{EventKind, ModifyKind};

    event
        .paths
        .iter()
        .filter(|path| is_definition(path))
        .filter_map(|path| match event.kind {
            EventKind::Create(_) => Some(WatchEvent::Created(path.clone())),
            EventKind::Remove(_) => Some(WatchEvent::Deleted(path.clone())),
            EventKind::Modify(ModifyKind::Name(_)) => {
                if path.exists() {
                    Some(WatchEvent::Created(path.clone()))
                } else {
                    Some(WatchEvent::Deleted(path.clone()))
                }
            }
            EventKind::Modify(_) => Some(WatchEvent::Changed(path.clone())),
            _ => None,
        })
        .collect()
}

fn is_definition(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Coalesces change bursts per path.
///
/// Only `Changed` events are debounced; a create or delete resets the
/// path's window so the next change is always delivered.
pub(crate) struct Debounce {
    window: Duration,
    last_changed: HashMap<PathBuf, Instant>,
}

impl Debounce {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            last_changed: HashMap::new(),
        }
    }

    pub(crate) fn should_deliver(&mut self, event: &WatchEvent, now: Instant) -> bool {
        match event {
            WatchEvent::Changed(path) => match self.last_changed.get(path) {
                Some(prev) if now.duration_since(*prev) < self.window => false,
                _ => {
                    self.last_changed.insert(path.clone(), now);
                    true
                }
            },
            WatchEvent::Created(path) | WatchEvent::Deleted(path) => {
                self.last_changed.remove(path);
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
