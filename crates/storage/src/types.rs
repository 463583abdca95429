// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted record types

use chrono::{DateTime, Utc};
use cog_core::LaunchType;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a run entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Running,
    Done,
    Failed,
    Stopped,
}

/// One workflow run, as seen by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique id of this run.
    pub id: String,
    pub workflow_id: i64,
    pub name: String,
    pub launch_type: LaunchType,
    pub status: EntryStatus,
    /// When `status` last changed.
    pub status_date: DateTime<Utc>,
}

/// Immutable record of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub workflow_id: i64,
    pub name: String,
    pub launch_type: LaunchType,
    pub status: EntryStatus,
    pub status_date: DateTime<Utc>,
}

impl HistoryEntry {
    /// Freeze an entry into its history record.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            workflow_id: entry.workflow_id,
            name: entry.name.clone(),
            launch_type: entry.launch_type,
            status: entry.status,
            status_date: entry.status_date,
        }
    }
}

/// Tally of entries per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub pending_count: u64,
    pub running_count: u64,
    pub done_count: u64,
    pub failed_count: u64,
    pub stopped_count: u64,
}

impl StatusCount {
    pub(crate) fn bucket_mut(&mut self, status: EntryStatus) -> &mut u64 {
        match status {
            EntryStatus::Pending => &mut self.pending_count,
            EntryStatus::Running => &mut self.running_count,
            EntryStatus::Done => &mut self.done_count,
            EntryStatus::Failed => &mut self.failed_count,
            EntryStatus::Stopped => &mut self.stopped_count,
        }
    }
}

/// An operator account, stored for front-ends; the engine only relays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// Password digest; hashing is the front-end's concern.
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Sort order for entry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrderBy {
    #[default]
    StatusDateDescending,
    StatusDateAscending,
    WorkflowIdAscending,
    WorkflowIdDescending,
    NameAscending,
    NameDescending,
}

/// Filter, window and paging for entry queries.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    /// Case-insensitive substring match on the entry name; empty matches all.
    pub keyword: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// 1-based page number; 0 disables paging.
    pub page: usize,
    pub page_size: usize,
    pub order_by: EntryOrderBy,
}

impl EntryQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn order_by(mut self, order_by: EntryOrderBy) -> Self {
        self.order_by = order_by;
        self
    }
}
