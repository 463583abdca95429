// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence collaborator interface

use crate::types::{Entry, EntryQuery, EntryStatus, HistoryEntry, StatusCount, User};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by a persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Operations the engine calls through unchanged.
///
/// Object-safe so the engine can hold an `Arc<dyn Persistence>` and tests
/// can substitute their own store.
pub trait Persistence: Send + Sync {
    /// Prepare the backend (connect, create tables). Called once at boot.
    fn init(&self) -> Result<(), StoreError>;

    fn clear_status_count(&self) -> Result<(), StoreError>;
    fn clear_entries(&self) -> Result<(), StoreError>;
    fn status_count(&self) -> Result<StatusCount, StoreError>;

    fn insert_entry(&self, entry: Entry) -> Result<(), StoreError>;
    fn update_entry_status(
        &self,
        id: &str,
        status: EntryStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    fn insert_history_entry(&self, entry: HistoryEntry) -> Result<(), StoreError>;

    fn entries(&self, query: &EntryQuery) -> Result<Vec<Entry>, StoreError>;
    fn entries_count(&self, query: &EntryQuery) -> Result<u64, StoreError>;
    fn history_entries(&self, query: &EntryQuery) -> Result<Vec<HistoryEntry>, StoreError>;
    fn history_entries_count(&self, query: &EntryQuery) -> Result<u64, StoreError>;

    fn entry_status_date_min(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn entry_status_date_max(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn history_status_date_min(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn history_status_date_max(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    fn insert_user(&self, user: User) -> Result<(), StoreError>;
    fn user(&self, name: &str) -> Result<Option<User>, StoreError>;
    fn password(&self, name: &str) -> Result<Option<String>, StoreError>;
}
