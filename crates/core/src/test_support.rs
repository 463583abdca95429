// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared by this crate's tests and, via the
//! `test-support` feature, by other crates' tests.

use crate::runner::{RunOutcome, TaskRunner};
use crate::workflow::{LaunchType, Workflow, WorkflowConfig};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Runner that completes immediately without doing anything.
pub struct InstantRunner;

#[async_trait]
impl TaskRunner for InstantRunner {
    async fn run(&self, _workflow: Arc<Workflow>) -> RunOutcome {
        RunOutcome::Done
    }
}

/// Builder for workflows in tests.
pub struct WorkflowBuilder {
    config: WorkflowConfig,
    runner: Arc<dyn TaskRunner>,
}

/// Start building a workflow with the given id.
///
/// Defaults: enabled startup workflow named `wf-{id}` backed by a file
/// `/flows/wf-{id}.xml` and an [`InstantRunner`].
pub fn workflow(id: i64) -> WorkflowBuilder {
    WorkflowBuilder {
        config: WorkflowConfig {
            id,
            name: format!("wf-{id}"),
            description: String::new(),
            file_path: PathBuf::from(format!("/flows/wf-{id}.xml")),
            enabled: true,
            launch_type: LaunchType::Startup,
            period: None,
            cron_expression: None,
            tasks: Vec::new(),
        },
        runner: Arc::new(InstantRunner),
    }
}

impl WorkflowBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.file_path = path.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.config.enabled = false;
        self
    }

    pub fn periodic(mut self, period: Duration) -> Self {
        self.config.launch_type = LaunchType::Periodic;
        self.config.period = Some(period);
        self
    }

    pub fn cron(mut self, expression: &str) -> Self {
        self.config.launch_type = LaunchType::Cron;
        self.config.cron_expression = Some(expression.to_string());
        self
    }

    pub fn runner(mut self, runner: Arc<dyn TaskRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn build(self) -> Arc<Workflow> {
        Arc::new(Workflow::new(self.config, self.runner))
    }
}
