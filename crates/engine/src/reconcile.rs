// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event reconciliation.
//!
//! Converts watcher events into registry and scheduler mutations. One
//! event at a time: the caller drains the watcher channel serially, so
//! events for the same path apply in arrival order. Definition files
//! are loaded before taking the engine lock.

use crate::engine::Engine;
use crate::scheduler::job_id;
use cog_core::{Clock, WatchEvent};
use cog_definition::{load_workflow, LoadOutcome};
use std::path::Path;
use std::sync::Arc;

impl<C: Clock> Engine<C> {
    /// Apply one filesystem event to the registry and the scheduler.
    ///
    /// Never propagates failures: every error path logs and leaves the
    /// registry in a consistent state.
    pub async fn reconcile(&self, event: WatchEvent) {
        tracing::debug!(kind = event.kind(), path = %event.path().display(), "reconciling");
        match event {
            WatchEvent::Created(path) => self.on_created(&path),
            WatchEvent::Changed(path) => self.on_changed(&path),
            WatchEvent::Deleted(path) => self.on_deleted(&path),
        }
    }

    fn on_created(&self, path: &Path) {
        let LoadOutcome::Loaded(workflow) = load_workflow(path, &self.loader) else {
            return;
        };

        let to_start = {
            let mut inner = self.inner.lock();
            if !Self::insert_logged(&mut inner.registry, Arc::clone(&workflow)) {
                return;
            }
            Self::schedule_locked(&mut inner, &workflow, self.clock.epoch_ms())
        };
        if let Some(workflow) = to_start {
            workflow.start();
        }
    }

    fn on_deleted(&self, path: &Path) {
        let mut inner = self.inner.lock();
        let Some(workflow) = inner.registry.get_by_path(path).cloned() else {
            // The file may never have loaded successfully.
            tracing::debug!(path = %path.display(), "deleted file had no registry entry");
            return;
        };

        workflow.stop();
        inner.triggers.remove(&job_id(workflow.id));
        inner.registry.remove_by_id(workflow.id);
        tracing::info!(
            workflow_id = workflow.id,
            name = %workflow.name,
            path = %path.display(),
            "workflow removed"
        );
    }

    /// Changed is remove-then-reload. If the reload fails, or its id
    /// collides with a workflow owned by some other file, the old entry
    /// is already gone: the file stays unregistered until its next
    /// change event.
    fn on_changed(&self, path: &Path) {
        {
            let mut inner = self.inner.lock();
            if let Some(old) = inner.registry.get_by_path(path).cloned() {
                old.stop();
                inner.triggers.remove(&job_id(old.id));
                inner.registry.remove_by_id(old.id);
                tracing::info!(
                    workflow_id = old.id,
                    path = %path.display(),
                    "workflow changed, reloading"
                );
            }
        }

        let LoadOutcome::Loaded(workflow) = load_workflow(path, &self.loader) else {
            return;
        };

        let to_start = {
            let mut inner = self.inner.lock();
            if !Self::insert_logged(&mut inner.registry, Arc::clone(&workflow)) {
                return;
            }
            Self::schedule_locked(&mut inner, &workflow, self.clock.epoch_ms())
        };
        if let Some(workflow) = to_start {
            workflow.start();
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
