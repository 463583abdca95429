// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger scheduling.
//!
//! [`TriggerSet`] is the virtual-time half of the scheduler: a map of
//! installed jobs with their next firing times in epoch milliseconds.
//! The engine's driver task supplies real time and invokes the due
//! workflows; tests drive it with a fake clock.
//!
//! Job identity is `"Workflow Job {id}"`, trigger identity
//! `"Workflow Trigger {id}"`. Installing over an existing job replaces
//! it, which is what makes rescheduling idempotent.

use chrono::{TimeZone, Utc};
use cog_core::Workflow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Scheduler job identity for a workflow.
pub fn job_id(workflow_id: i64) -> String {
    format!("Workflow Job {workflow_id}")
}

/// Scheduler trigger identity for a workflow.
pub fn trigger_id(workflow_id: i64) -> String {
    format!("Workflow Trigger {workflow_id}")
}

/// When an installed job fires.
#[derive(Debug, Clone)]
pub enum FiringPolicy {
    /// Fixed interval, repeating forever.
    Every(Duration),
    /// Occurrences of a cron schedule.
    Cron(Box<cron::Schedule>),
}

impl FiringPolicy {
    /// Next firing strictly after `now_ms`, or `None` when the policy
    /// has no future occurrence (a year-bounded cron schedule can run dry).
    fn next_fire_ms(&self, now_ms: u64) -> Option<u64> {
        match self {
            FiringPolicy::Every(period) => Some(now_ms + period.as_millis() as u64),
            FiringPolicy::Cron(schedule) => {
                let now = Utc.timestamp_millis_opt(now_ms as i64).single()?;
                let next = schedule.after(&now).next()?;
                u64::try_from(next.timestamp_millis()).ok()
            }
        }
    }
}

struct Trigger {
    trigger_id: String,
    policy: FiringPolicy,
    workflow: Arc<Workflow>,
    next_fire_ms: u64,
}

/// Installed scheduler jobs, keyed by job identity.
#[derive(Default)]
pub struct TriggerSet {
    triggers: HashMap<String, Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a job, replacing any existing job with the same identity.
    pub fn install(
        &mut self,
        job: String,
        trigger: String,
        policy: FiringPolicy,
        workflow: Arc<Workflow>,
        now_ms: u64,
    ) {
        if self.triggers.remove(&job).is_some() {
            tracing::debug!(job = %job, "replacing existing scheduler job");
        }
        let Some(next_fire_ms) = policy.next_fire_ms(now_ms) else {
            tracing::warn!(
                job = %job,
                workflow_id = workflow.id,
                "schedule has no future occurrence, job not installed"
            );
            return;
        };
        self.triggers.insert(
            job,
            Trigger {
                trigger_id: trigger,
                policy,
                workflow,
                next_fire_ms,
            },
        );
    }

    /// Remove a job if present.
    pub fn remove(&mut self, job: &str) -> bool {
        self.triggers.remove(job).is_some()
    }

    pub fn contains(&self, job: &str) -> bool {
        self.triggers.contains_key(job)
    }

    /// Trigger identity of an installed job.
    pub fn trigger_of(&self, job: &str) -> Option<&str> {
        self.triggers.get(job).map(|t| t.trigger_id.as_str())
    }

    /// Installed job identities.
    pub fn job_ids(&self) -> Vec<String> {
        self.triggers.keys().cloned().collect()
    }

    /// Collect workflows whose firing time has arrived, rescheduling
    /// each for its next occurrence. A trigger whose schedule runs dry
    /// is dropped.
    pub fn due(&mut self, now_ms: u64) -> Vec<Arc<Workflow>> {
        let due_jobs: Vec<String> = self
            .triggers
            .iter()
            .filter(|(_, t)| t.next_fire_ms <= now_ms)
            .map(|(job, _)| job.clone())
            .collect();

        let mut fired = Vec::new();
        for job in due_jobs {
            let Some(trigger) = self.triggers.get_mut(&job) else {
                continue;
            };
            fired.push(Arc::clone(&trigger.workflow));
            match trigger.policy.next_fire_ms(now_ms) {
                Some(next) => trigger.next_fire_ms = next,
                None => {
                    tracing::warn!(job = %job, "schedule exhausted, removing job");
                    self.triggers.remove(&job);
                }
            }
        }
        fired
    }

    /// Earliest installed firing time.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.triggers.values().map(|t| t.next_fire_ms).min()
    }

    /// Drop every installed job, abandoning pending firings.
    pub fn clear(&mut self) {
        self.triggers.clear();
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
