// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake task runner for testing

use async_trait::async_trait;
use cog_core::{RunOutcome, TaskRunner, Workflow};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct FakeRunnerState {
    starts: Vec<i64>,
    outcome: RunOutcome,
    hold: bool,
}

/// Fake runner that records every launch.
///
/// By default runs complete immediately with the configured outcome.
/// A holding runner keeps each run open until the workflow is stopped,
/// for tests that need workflows observably Running.
#[derive(Clone)]
pub struct FakeRunner {
    inner: Arc<Mutex<FakeRunnerState>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeRunnerState {
                starts: Vec::new(),
                outcome: RunOutcome::Done,
                hold: false,
            })),
        }
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner whose runs stay open until `stop()` is observed.
    pub fn holding() -> Self {
        let runner = Self::new();
        runner.inner.lock().hold = true;
        runner
    }

    pub fn set_outcome(&self, outcome: RunOutcome) {
        self.inner.lock().outcome = outcome;
    }

    /// Workflow ids passed to `run`, in launch order.
    pub fn started_ids(&self) -> Vec<i64> {
        self.inner.lock().starts.clone()
    }

    pub fn start_count(&self) -> usize {
        self.inner.lock().starts.len()
    }
}

#[async_trait]
impl TaskRunner for FakeRunner {
    async fn run(&self, workflow: Arc<Workflow>) -> RunOutcome {
        let (hold, outcome) = {
            let mut state = self.inner.lock();
            state.starts.push(workflow.id);
            (state.hold, state.outcome)
        };

        if hold {
            loop {
                if workflow.stop_requested() {
                    return RunOutcome::Stopped;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
        outcome
    }
}
