// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op task runner.

use async_trait::async_trait;
use cog_core::{RunOutcome, TaskRunner, Workflow};
use std::sync::Arc;

/// Runner used when no task executor is wired in.
///
/// Every run completes immediately; the engine's scheduling, lifecycle
/// and bookkeeping still exercise their full paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRunner;

impl NoopRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TaskRunner for NoopRunner {
    async fn run(&self, workflow: Arc<Workflow>) -> RunOutcome {
        tracing::debug!(
            workflow_id = workflow.id,
            tasks = workflow.tasks.len(),
            "no task executor configured, completing immediately"
        );
        RunOutcome::Done
    }
}
