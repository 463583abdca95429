// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording wrapper for task runners.
//!
//! Wraps any runner and writes a run entry through the persistence
//! collaborator around the inner execution, plus a frozen history record
//! once the run finishes. Entries move Pending → Running →
//! Done/Failed/Stopped. Store failures are logged and never interrupt
//! the run.

use async_trait::async_trait;
use chrono::Utc;
use cog_core::{RunOutcome, TaskRunner, Workflow};
use cog_storage::{Entry, EntryStatus, HistoryEntry, Persistence};
use std::sync::Arc;

/// Wrapper that records runs through a persistence handle.
pub struct Recorded<R> {
    inner: R,
    store: Arc<dyn Persistence>,
}

impl<R> Recorded<R> {
    pub fn new(inner: R, store: Arc<dyn Persistence>) -> Self {
        Self { inner, store }
    }
}

fn outcome_status(outcome: RunOutcome) -> EntryStatus {
    match outcome {
        RunOutcome::Done => EntryStatus::Done,
        RunOutcome::Failed => EntryStatus::Failed,
        RunOutcome::Stopped => EntryStatus::Stopped,
    }
}

#[async_trait]
impl<R: TaskRunner> TaskRunner for Recorded<R> {
    async fn run(&self, workflow: Arc<Workflow>) -> RunOutcome {
        let entry = Entry {
            id: uuid::Uuid::new_v4().to_string(),
            workflow_id: workflow.id,
            name: workflow.name.clone(),
            launch_type: workflow.launch_type,
            status: EntryStatus::Pending,
            status_date: Utc::now(),
        };
        let entry_id = entry.id.clone();
        if let Err(e) = self.store.insert_entry(entry) {
            tracing::warn!(workflow_id = workflow.id, error = %e, "failed to record run entry");
        }

        if let Err(e) = self
            .store
            .update_entry_status(&entry_id, EntryStatus::Running, Utc::now())
        {
            tracing::warn!(workflow_id = workflow.id, error = %e, "failed to mark run entry running");
        }
        let outcome = self.inner.run(Arc::clone(&workflow)).await;

        let status = outcome_status(outcome);
        let finished_at = Utc::now();
        if let Err(e) = self.store.update_entry_status(&entry_id, status, finished_at) {
            tracing::warn!(workflow_id = workflow.id, error = %e, "failed to update run entry");
        }
        let history = HistoryEntry {
            id: entry_id,
            workflow_id: workflow.id,
            name: workflow.name.clone(),
            launch_type: workflow.launch_type,
            status,
            status_date: finished_at,
        };
        if let Err(e) = self.store.insert_history_entry(history) {
            tracing::warn!(workflow_id = workflow.id, error = %e, "failed to record history entry");
        }

        outcome
    }
}

#[cfg(test)]
#[path = "recorded_tests.rs"]
mod tests;
