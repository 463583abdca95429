// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task execution seam.
//!
//! The engine decides *when* a workflow runs; interpreting its task graph
//! is the job of a [`TaskRunner`] collaborator supplied at load time.
//! Runners execute on a workflow-owned tokio task after [`crate::Workflow::start`]
//! has transitioned the state machine to Running.

use crate::workflow::Workflow;
use async_trait::async_trait;
use std::sync::Arc;

/// How a workflow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All tasks completed.
    Done,
    /// A task reported failure.
    Failed,
    /// The run observed a stop request and bailed out early.
    Stopped,
}

/// Executes the task phase of a workflow.
///
/// Implementations should poll [`Workflow::stop_requested`] between tasks
/// and return [`RunOutcome::Stopped`] promptly when it is raised; `stop()`
/// on a workflow is best-effort and never waits for the runner.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, workflow: Arc<Workflow>) -> RunOutcome;
}
