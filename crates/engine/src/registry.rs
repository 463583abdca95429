// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory workflow registry.
//!
//! The process-wide set of loaded workflows, keyed uniquely by workflow
//! id with a secondary index by definition file path. Not internally
//! locked: the registry lives inside the engine's single critical
//! section together with the trigger set.

use cog_core::Workflow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Uniqueness violations on insert. The existing entry always wins.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("workflow id {id} already registered by {existing} (incoming: {incoming})")]
    DuplicateId {
        id: i64,
        existing: PathBuf,
        incoming: PathBuf,
    },

    #[error("definition file {path} already registered")]
    DuplicatePath { path: PathBuf },
}

/// Set of loaded workflows with unique ids and unique file paths.
#[derive(Default)]
pub struct Registry {
    by_id: HashMap<i64, Arc<Workflow>>,
    by_path: HashMap<PathBuf, i64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a workflow, enforcing id and path uniqueness.
    pub fn insert(&mut self, workflow: Arc<Workflow>) -> Result<(), InsertError> {
        if let Some(existing) = self.by_id.get(&workflow.id) {
            return Err(InsertError::DuplicateId {
                id: workflow.id,
                existing: existing.file_path.clone(),
                incoming: workflow.file_path.clone(),
            });
        }
        if self.by_path.contains_key(&workflow.file_path) {
            return Err(InsertError::DuplicatePath {
                path: workflow.file_path.clone(),
            });
        }
        self.by_path.insert(workflow.file_path.clone(), workflow.id);
        self.by_id.insert(workflow.id, workflow);
        Ok(())
    }

    pub fn remove_by_id(&mut self, id: i64) -> Option<Arc<Workflow>> {
        let workflow = self.by_id.remove(&id)?;
        self.by_path.remove(&workflow.file_path);
        Some(workflow)
    }

    pub fn remove_by_path(&mut self, path: &Path) -> Option<Arc<Workflow>> {
        let id = self.by_path.remove(path)?;
        self.by_id.remove(&id)
    }

    pub fn get(&self, id: i64) -> Option<&Arc<Workflow>> {
        self.by_id.get(&id)
    }

    pub fn get_by_path(&self, path: &Path) -> Option<&Arc<Workflow>> {
        self.by_path.get(path).and_then(|id| self.by_id.get(id))
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Snapshot of all registered workflows.
    pub fn workflows(&self) -> Vec<Arc<Workflow>> {
        self.by_id.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
