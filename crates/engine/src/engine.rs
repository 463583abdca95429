// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine façade: boot, run, stop.
//!
//! Owns the single critical section shared by the reconciler, the
//! scheduler driver and operator control operations. Definition files
//! are loaded outside the lock; the reconcile-and-install step that
//! follows is inside.

use crate::registry::Registry;
use crate::scheduler::{job_id, trigger_id, FiringPolicy, TriggerSet};
use crate::EngineError;
use cog_core::{Clock, LaunchType, TaskRunner, Workflow};
use cog_definition::{load_workflow, parse_cron_expression, LoadOutcome, LoaderContext, Settings};
use cog_storage::Persistence;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collaborators handed to the engine at construction.
pub struct EngineDeps<C: Clock> {
    pub settings: Settings,
    pub store: Arc<dyn Persistence>,
    /// Executes the task phase of every loaded workflow.
    pub runner: Arc<dyn TaskRunner>,
    pub clock: C,
}

/// Tunables with defaults fit for production.
pub struct EngineConfig {
    /// Resolution of the scheduler driver's due-trigger checks.
    pub timer_check: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timer_check: Duration::from_millis(500),
        }
    }
}

/// Registry + trigger set + scheduler state: one critical section.
pub(crate) struct Inner {
    pub(crate) registry: Registry,
    pub(crate) triggers: TriggerSet,
    pub(crate) started: bool,
}

/// The orchestration engine.
pub struct Engine<C: Clock> {
    workflows_folder: PathBuf,
    pub(crate) loader: LoaderContext,
    pub(crate) store: Arc<dyn Persistence>,
    pub(crate) clock: C,
    timer_check: Duration,
    pub(crate) inner: Arc<Mutex<Inner>>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clock> Engine<C> {
    pub fn new(deps: EngineDeps<C>) -> Self {
        Self::with_config(deps, EngineConfig::default())
    }

    pub fn with_config(deps: EngineDeps<C>, config: EngineConfig) -> Self {
        let EngineDeps {
            settings,
            store,
            runner,
            clock,
        } = deps;
        Self {
            workflows_folder: PathBuf::from(&settings.workflows_folder),
            loader: LoaderContext {
                temp_folder: PathBuf::from(&settings.temp_folder),
                xsd: PathBuf::from(&settings.xsd),
                runner,
            },
            store,
            clock,
            timer_check: config.timer_check,
            inner: Arc::new(Mutex::new(Inner {
                registry: Registry::new(),
                triggers: TriggerSet::new(),
                started: false,
            })),
            driver: Mutex::new(None),
        }
    }

    /// Load every `*.xml` definition in the workflows folder into the
    /// registry. Bad definitions are logged and skipped; the boot never
    /// aborts because one file is broken.
    pub fn load_all(&self) {
        let entries = match std::fs::read_dir(&self.workflows_folder) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    folder = %self.workflows_folder.display(),
                    error = %e,
                    "cannot read workflows folder"
                );
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
            })
            .collect();
        paths.sort();

        for path in paths {
            let LoadOutcome::Loaded(workflow) = load_workflow(&path, &self.loader) else {
                continue;
            };
            let mut inner = self.inner.lock();
            Self::insert_logged(&mut inner.registry, workflow);
        }

        let count = self.inner.lock().registry.len();
        tracing::info!(count, folder = %self.workflows_folder.display(), "workflows loaded");
    }

    /// Schedule every enabled workflow and start the scheduler driver.
    /// Starting a started engine is a no-op.
    pub async fn run(&self) {
        let to_start = {
            let mut inner = self.inner.lock();
            if inner.started {
                tracing::debug!("scheduler already started");
                return;
            }
            inner.started = true;
            let now_ms = self.clock.epoch_ms();
            let workflows = inner.registry.workflows();
            let mut to_start = Vec::new();
            for workflow in &workflows {
                if let Some(wf) = Self::schedule_locked(&mut inner, workflow, now_ms) {
                    to_start.push(wf);
                }
            }
            to_start
        };

        // Startup workflows launch inline, outside the lock.
        for workflow in to_start {
            workflow.start();
        }

        self.spawn_driver();
        tracing::info!("scheduler started");
    }

    /// Stop the engine.
    ///
    /// Order matters: the scheduler is shut down first so no new firing
    /// races the per-workflow stops that follow.
    pub async fn stop(&self, stop_scheduler: bool, clear_state: bool) -> Result<(), EngineError> {
        if stop_scheduler {
            {
                let mut inner = self.inner.lock();
                inner.started = false;
                inner.triggers.clear();
            }
            let handle = self.driver.lock().take();
            if let Some(handle) = handle {
                handle.abort();
                let _ = handle.await;
            }
            tracing::info!("scheduler stopped");
        }

        let running: Vec<Arc<Workflow>> = {
            let inner = self.inner.lock();
            inner
                .registry
                .workflows()
                .into_iter()
                .filter(|w| w.is_running())
                .collect()
        };
        for workflow in running {
            workflow.stop();
        }

        if clear_state {
            self.store.clear_status_count()?;
            self.store.clear_entries()?;
            tracing::info!("cleared persisted status counts and entries");
        }
        Ok(())
    }

    /// Whether the scheduler is in its Started state.
    pub fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    /// Snapshot of the registry.
    pub fn workflows(&self) -> Vec<Arc<Workflow>> {
        self.inner.lock().registry.workflows()
    }

    /// Installed scheduler job identities.
    pub fn scheduled_job_ids(&self) -> Vec<String> {
        self.inner.lock().triggers.job_ids()
    }

    /// Whether the workflow's scheduler job is installed.
    pub fn job_exists(&self, workflow_id: i64) -> bool {
        self.inner.lock().triggers.contains(&job_id(workflow_id))
    }

    /// Earliest pending firing time, in epoch milliseconds.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.inner.lock().triggers.next_deadline_ms()
    }

    /// Insert into the registry, logging uniqueness violations. The
    /// existing entry wins; returns whether the insert took effect.
    pub(crate) fn insert_logged(registry: &mut Registry, workflow: Arc<Workflow>) -> bool {
        let id = workflow.id;
        let path = workflow.file_path.clone();
        match registry.insert(workflow) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(workflow_id = id, incoming = %path.display(), error = %e, "workflow discarded");
                false
            }
        }
    }

    /// Bind a workflow to its trigger per launch type. Returns the
    /// workflow when it is a Startup entry the caller must launch inline
    /// (only while the scheduler is started). Disabled workflows are
    /// never scheduled.
    pub(crate) fn schedule_locked(
        inner: &mut Inner,
        workflow: &Arc<Workflow>,
        now_ms: u64,
    ) -> Option<Arc<Workflow>> {
        if !workflow.enabled {
            tracing::debug!(workflow_id = workflow.id, "workflow disabled, not scheduled");
            return None;
        }
        match workflow.launch_type {
            LaunchType::Startup => {
                if inner.started {
                    return Some(Arc::clone(workflow));
                }
                None
            }
            LaunchType::Periodic => {
                let Some(period) = workflow.period else {
                    tracing::warn!(workflow_id = workflow.id, "periodic workflow without period");
                    return None;
                };
                inner.triggers.install(
                    job_id(workflow.id),
                    trigger_id(workflow.id),
                    FiringPolicy::Every(period),
                    Arc::clone(workflow),
                    now_ms,
                );
                None
            }
            LaunchType::Cron => {
                let Some(expression) = workflow.cron_expression.as_deref() else {
                    tracing::warn!(workflow_id = workflow.id, "cron workflow without expression");
                    return None;
                };
                match parse_cron_expression(expression) {
                    Ok(schedule) => {
                        inner.triggers.install(
                            job_id(workflow.id),
                            trigger_id(workflow.id),
                            FiringPolicy::Cron(Box::new(schedule)),
                            Arc::clone(workflow),
                            now_ms,
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            workflow_id = workflow.id,
                            expression,
                            error = %e,
                            "cron expression rejected at schedule time"
                        );
                    }
                }
                None
            }
        }
    }

    fn spawn_driver(&self) {
        let inner = Arc::clone(&self.inner);
        let clock = self.clock.clone();
        let period = self.timer_check;

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                let due = {
                    let mut guard = inner.lock();
                    if !guard.started {
                        break;
                    }
                    guard.triggers.due(clock.epoch_ms())
                };
                for workflow in due {
                    // A firing that lands while the previous run is still
                    // active is skipped, not queued.
                    if !workflow.start() {
                        tracing::debug!(
                            workflow_id = workflow.id,
                            "firing skipped: previous run still active"
                        );
                    }
                }
            }
            tracing::debug!("scheduler driver stopped");
        });
        *self.driver.lock() = Some(handle);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
