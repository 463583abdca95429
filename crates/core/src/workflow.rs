// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow value and its observed state machine.
//!
//! A `Workflow` is produced by the definition loader and held in the
//! engine registry. The engine only ever calls the four lifecycle
//! operations; enforcement of legal transitions lives here:
//!
//! ```text
//!       start                suspend            resume
//!  Idle ─────► Running ◄──────────────────► Suspended
//!   ▲             │ stop                        │ stop
//!   └─────────────┴────────────────────────────┘
//! ```
//!
//! Task completion also returns the workflow to Idle.

use crate::runner::{RunOutcome, TaskRunner};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Firing policy for a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchType {
    /// Started once when the engine boots (or when the file appears).
    Startup,
    /// Fired on a fixed interval, repeating forever.
    Periodic,
    /// Fired on the occurrences of a cron expression.
    Cron,
}

impl LaunchType {
    /// Parse the `launchType` setting value, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "startup" => Some(LaunchType::Startup),
            "periodic" => Some(LaunchType::Periodic),
            "cron" => Some(LaunchType::Cron),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchType::Startup => "startup",
            LaunchType::Periodic => "periodic",
            LaunchType::Cron => "cron",
        }
    }
}

/// Observable execution state of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Running,
    Suspended,
}

/// One task in a workflow's task graph.
///
/// The engine never interprets tasks; they are carried for the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    /// Task settings in definition order.
    pub settings: IndexMap<String, String>,
}

/// Immutable attributes of a workflow, as read from its definition file.
pub struct WorkflowConfig {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub file_path: PathBuf,
    pub enabled: bool,
    pub launch_type: LaunchType,
    /// Interval between firings. Meaningful only for Periodic.
    pub period: Option<Duration>,
    /// Firing schedule. Meaningful only for Cron; validated by the loader.
    pub cron_expression: Option<String>,
    pub tasks: Vec<TaskDef>,
}

/// A loaded workflow.
///
/// Shared as `Arc<Workflow>` between the registry, the trigger scheduler
/// and in-flight runs. The definition fields are immutable; only the
/// execution state mutates, behind an internal lock.
pub struct Workflow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub file_path: PathBuf,
    pub enabled: bool,
    pub launch_type: LaunchType,
    pub period: Option<Duration>,
    pub cron_expression: Option<String>,
    pub tasks: Vec<TaskDef>,

    status: Mutex<WorkflowStatus>,
    stop_flag: AtomicBool,
    /// Bumped on every start so a finished run cannot clobber the state
    /// of a newer one.
    run_seq: AtomicU64,
    runner: Arc<dyn TaskRunner>,
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("file_path", &self.file_path)
            .field("enabled", &self.enabled)
            .field("launch_type", &self.launch_type)
            .field("period", &self.period)
            .field("cron_expression", &self.cron_expression)
            .field("tasks", &self.tasks)
            .field("status", &self.status)
            .finish()
    }
}

impl Workflow {
    pub fn new(config: WorkflowConfig, runner: Arc<dyn TaskRunner>) -> Self {
        Self {
            id: config.id,
            name: config.name,
            description: config.description,
            file_path: config.file_path,
            enabled: config.enabled,
            launch_type: config.launch_type,
            period: config.period,
            cron_expression: config.cron_expression,
            tasks: config.tasks,
            status: Mutex::new(WorkflowStatus::Idle),
            stop_flag: AtomicBool::new(false),
            run_seq: AtomicU64::new(0),
            runner,
        }
    }

    /// Current state machine position.
    pub fn status(&self) -> WorkflowStatus {
        *self.status.lock()
    }

    /// Whether a run is in flight (Running or Suspended).
    pub fn is_running(&self) -> bool {
        !matches!(self.status(), WorkflowStatus::Idle)
    }

    /// Whether the current run has been asked to stop.
    pub fn stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }

    /// Launch the task phase. Idle → Running; returns `false` (and does
    /// nothing) when a run is already in flight, making scheduled firings
    /// safe to overlap.
    ///
    /// Returns after spawning; task execution proceeds on a
    /// workflow-owned tokio task through the runner.
    pub fn start(self: &Arc<Self>) -> bool {
        let seq = {
            let mut status = self.status.lock();
            if !matches!(*status, WorkflowStatus::Idle) {
                tracing::debug!(
                    workflow_id = self.id,
                    status = ?*status,
                    "start skipped: run already in flight"
                );
                return false;
            }
            *status = WorkflowStatus::Running;
            self.stop_flag.store(false, Ordering::SeqCst);
            self.run_seq.fetch_add(1, Ordering::SeqCst) + 1
        };

        tracing::info!(workflow_id = self.id, name = %self.name, "starting workflow");

        let workflow = Arc::clone(self);
        tokio::spawn(async move {
            let runner = Arc::clone(&workflow.runner);
            let outcome = runner.run(Arc::clone(&workflow)).await;
            workflow.finish(seq, outcome);
        });
        true
    }

    /// Request the in-flight run to stop. Running/Suspended → Idle;
    /// best-effort, returns promptly without waiting for the runner.
    pub fn stop(&self) -> bool {
        let mut status = self.status.lock();
        match *status {
            WorkflowStatus::Running | WorkflowStatus::Suspended => {
                *status = WorkflowStatus::Idle;
                self.stop_flag.store(true, Ordering::SeqCst);
                tracing::info!(workflow_id = self.id, name = %self.name, "stopping workflow");
                true
            }
            WorkflowStatus::Idle => false,
        }
    }

    /// Running → Suspended. Honoring the pause mid-run is the runner's
    /// concern; the state flip is what the engine observes.
    pub fn suspend(&self) -> bool {
        let mut status = self.status.lock();
        if matches!(*status, WorkflowStatus::Running) {
            *status = WorkflowStatus::Suspended;
            tracing::info!(workflow_id = self.id, name = %self.name, "suspending workflow");
            true
        } else {
            false
        }
    }

    /// Suspended → Running.
    pub fn resume(&self) -> bool {
        let mut status = self.status.lock();
        if matches!(*status, WorkflowStatus::Suspended) {
            *status = WorkflowStatus::Running;
            tracing::info!(workflow_id = self.id, name = %self.name, "resuming workflow");
            true
        } else {
            false
        }
    }

    /// Record run completion. Ignored when a newer run owns the state
    /// (the workflow was stopped and restarted while this run unwound).
    fn finish(&self, seq: u64, outcome: RunOutcome) {
        if self.run_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(workflow_id = self.id, "stale run completion ignored");
            return;
        }
        let mut status = self.status.lock();
        *status = WorkflowStatus::Idle;
        tracing::info!(workflow_id = self.id, name = %self.name, outcome = ?outcome, "workflow run finished");
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
