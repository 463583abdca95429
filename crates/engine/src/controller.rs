// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator lifecycle operations, keyed by workflow id.
//!
//! Every operation shares one prologue: look the workflow up (log and
//! bail when unknown), skip disabled workflows, then delegate to the
//! workflow's own state machine. Control operations never touch the
//! scheduler; jobs change only on file delete or change.

use crate::engine::Engine;
use cog_core::{Clock, Workflow};
use std::sync::Arc;

impl<C: Clock> Engine<C> {
    /// Look up a workflow by id.
    pub fn get_workflow(&self, id: i64) -> Option<Arc<Workflow>> {
        self.inner.lock().registry.get(id).cloned()
    }

    /// Launch the workflow's task phase.
    pub fn start_workflow(&self, id: i64) -> bool {
        self.with_enabled_workflow(id, "start", |wf| wf.start())
    }

    /// Stop the in-flight run, best-effort.
    pub fn stop_workflow(&self, id: i64) -> bool {
        self.with_enabled_workflow(id, "stop", |wf| wf.stop())
    }

    /// Pause the in-flight run.
    pub fn suspend_workflow(&self, id: i64) -> bool {
        self.with_enabled_workflow(id, "suspend", |wf| wf.suspend())
    }

    /// Resume a suspended run.
    pub fn resume_workflow(&self, id: i64) -> bool {
        self.with_enabled_workflow(id, "resume", |wf| wf.resume())
    }

    /// Shared prologue for the control operations. Returns whether the
    /// delegated action reported a state transition.
    fn with_enabled_workflow(
        &self,
        id: i64,
        op: &'static str,
        action: impl FnOnce(&Arc<Workflow>) -> bool,
    ) -> bool {
        let workflow = self.get_workflow(id);
        let Some(workflow) = workflow else {
            tracing::error!(workflow_id = id, op, "control operation on unknown workflow");
            return false;
        };
        if !workflow.enabled {
            tracing::debug!(workflow_id = id, op, "control operation ignored: workflow disabled");
            return false;
        }
        action(&workflow)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
