// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow definition parsing (XML).
//!
//! A definition file carries the workflow's identity, its launch policy
//! and the task graph:
//!
//! ```xml
//! <Workflow id="7" name="nightly-sync" description="...">
//!   <Settings>
//!     <Setting name="launchType" value="periodic"/>
//!     <Setting name="enabled" value="true"/>
//!     <Setting name="period" value="60s"/>
//!   </Settings>
//!   <Tasks>
//!     <Task id="1" name="copy" enabled="true">
//!       <Setting name="from" value="/in"/>
//!       <Setting name="to" value="/out"/>
//!     </Task>
//!   </Tasks>
//! </Workflow>
//! ```
//!
//! The loader validates identity and launch policy; task settings are
//! carried opaquely for the task runner.

use crate::cron::is_cron_expression_valid;
use crate::period::parse_period;
use cog_core::{LaunchType, TaskDef, TaskRunner, Workflow, WorkflowConfig};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while parsing a workflow definition
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element must be <Workflow>, found <{0}>")]
    UnexpectedRoot(String),

    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        attribute: &'static str,
        element: &'static str,
    },

    #[error("invalid workflow id '{0}': must be an integer")]
    InvalidId(String),

    #[error("workflow name must not be empty")]
    EmptyName,

    #[error("missing setting '{0}'")]
    MissingSetting(&'static str),

    #[error("invalid value '{value}' for setting '{name}'")]
    InvalidSetting { name: &'static str, value: String },

    #[error("invalid launch type '{0}'")]
    InvalidLaunchType(String),

    #[error("invalid period '{value}': {reason}")]
    InvalidPeriod { value: String, reason: String },

    #[error("invalid cron expression '{0}'")]
    InvalidCronExpression(String),

    #[error("invalid task id '{0}': must be an integer")]
    InvalidTaskId(String),

    #[error("duplicate task id {0}")]
    DuplicateTaskId(i64),
}

/// Collaborator handles the loader forwards into each workflow it builds.
///
/// The task runner embodies the persistence handle: runs are recorded
/// through it (see the adapters crate's recording runner), so the loader
/// itself never touches the store.
pub struct LoaderContext {
    /// Scratch directory for task execution.
    pub temp_folder: PathBuf,
    /// Workflow schema path, forwarded to validating runners.
    pub xsd: PathBuf,
    /// Executes the task phase of every workflow built by this loader.
    pub runner: Arc<dyn TaskRunner>,
}

/// Result of loading one definition file.
///
/// Load failures are terminal for the file until its next change event;
/// the engine never aborts because one definition is bad.
pub enum LoadOutcome {
    Loaded(Arc<Workflow>),
    Failed { path: PathBuf, reason: String },
}

impl LoadOutcome {
    /// The loaded workflow, if any.
    pub fn workflow(self) -> Option<Arc<Workflow>> {
        match self {
            LoadOutcome::Loaded(wf) => Some(wf),
            LoadOutcome::Failed { .. } => None,
        }
    }
}

/// Load a workflow from a definition file. Failures are logged with the
/// path and cause, and reported as a value rather than an error so that
/// callers can continue with their remaining files.
pub fn load_workflow(path: &Path, ctx: &LoaderContext) -> LoadOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read workflow definition");
            return LoadOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
        }
    };

    match parse_workflow(&content, path, Arc::clone(&ctx.runner)) {
        Ok(workflow) => {
            tracing::info!(
                workflow_id = workflow.id,
                name = %workflow.name,
                launch_type = workflow.launch_type.as_str(),
                path = %path.display(),
                "workflow loaded"
            );
            LoadOutcome::Loaded(Arc::new(workflow))
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to load workflow definition");
            LoadOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

/// Parse a workflow definition from XML content.
pub fn parse_workflow(
    content: &str,
    path: &Path,
    runner: Arc<dyn TaskRunner>,
) -> Result<Workflow, ParseError> {
    let doc = roxmltree::Document::parse(content)?;
    let root = doc.root_element();
    if root.tag_name().name() != "Workflow" {
        return Err(ParseError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    let id_str = root.attribute("id").ok_or(ParseError::MissingAttribute {
        attribute: "id",
        element: "Workflow",
    })?;
    let id: i64 = id_str
        .parse()
        .map_err(|_| ParseError::InvalidId(id_str.to_string()))?;

    let name = root
        .attribute("name")
        .ok_or(ParseError::MissingAttribute {
            attribute: "name",
            element: "Workflow",
        })?
        .trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }
    let description = root.attribute("description").unwrap_or_default();

    let settings = collect_settings(root);
    let launch_type_str = settings
        .get("launchType")
        .ok_or(ParseError::MissingSetting("launchType"))?;
    let launch_type = LaunchType::parse(launch_type_str)
        .ok_or_else(|| ParseError::InvalidLaunchType(launch_type_str.clone()))?;

    let enabled = match settings.get("enabled") {
        None => true,
        Some(value) => parse_bool(value).ok_or_else(|| ParseError::InvalidSetting {
            name: "enabled",
            value: value.clone(),
        })?,
    };

    let period = match launch_type {
        LaunchType::Periodic => {
            let value = settings
                .get("period")
                .ok_or(ParseError::MissingSetting("period"))?;
            Some(
                parse_period(value).map_err(|reason| ParseError::InvalidPeriod {
                    value: value.clone(),
                    reason,
                })?,
            )
        }
        _ => None,
    };

    let cron_expression = match launch_type {
        LaunchType::Cron => {
            let value = settings
                .get("cronExpression")
                .ok_or(ParseError::MissingSetting("cronExpression"))?;
            if !is_cron_expression_valid(value) {
                return Err(ParseError::InvalidCronExpression(value.clone()));
            }
            Some(value.clone())
        }
        _ => None,
    };

    let tasks = parse_tasks(root)?;

    Ok(Workflow::new(
        WorkflowConfig {
            id,
            name: name.to_string(),
            description: description.to_string(),
            file_path: path.to_path_buf(),
            enabled,
            launch_type,
            period,
            cron_expression,
            tasks,
        },
        runner,
    ))
}

/// Collect `<Setting name=... value=...>` pairs under `<Settings>`.
fn collect_settings(root: roxmltree::Node<'_, '_>) -> HashMap<String, String> {
    let mut settings = HashMap::new();
    let Some(block) = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "Settings")
    else {
        return settings;
    };
    for node in block
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Setting")
    {
        if let (Some(name), Some(value)) = (node.attribute("name"), node.attribute("value")) {
            settings.insert(name.to_string(), value.to_string());
        }
    }
    settings
}

fn parse_tasks(root: roxmltree::Node<'_, '_>) -> Result<Vec<TaskDef>, ParseError> {
    let mut tasks = Vec::new();
    let mut seen_ids = HashSet::new();
    let Some(block) = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "Tasks")
    else {
        return Ok(tasks);
    };

    for node in block
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Task")
    {
        let id_str = node.attribute("id").ok_or(ParseError::MissingAttribute {
            attribute: "id",
            element: "Task",
        })?;
        let id: i64 = id_str
            .parse()
            .map_err(|_| ParseError::InvalidTaskId(id_str.to_string()))?;
        if !seen_ids.insert(id) {
            return Err(ParseError::DuplicateTaskId(id));
        }

        let name = node
            .attribute("name")
            .ok_or(ParseError::MissingAttribute {
                attribute: "name",
                element: "Task",
            })?;
        let enabled = match node.attribute("enabled") {
            None => true,
            Some(value) => parse_bool(value).ok_or_else(|| ParseError::InvalidSetting {
                name: "enabled",
                value: value.to_string(),
            })?,
        };

        let mut settings = IndexMap::new();
        for setting in node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "Setting")
        {
            if let (Some(name), Some(value)) = (setting.attribute("name"), setting.attribute("value"))
            {
                settings.insert(name.to_string(), value.to_string());
            }
        }

        tasks.push(TaskDef {
            id,
            name: name.to_string(),
            description: node.attribute("description").unwrap_or_default().to_string(),
            enabled,
            settings,
        });
    }

    Ok(tasks)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
