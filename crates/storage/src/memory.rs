// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory persistence backend.
//!
//! Holds entries, history and users in lock-protected maps. Status
//! counts are maintained incrementally as entries move through their
//! statuses rather than recomputed per query.

use crate::store::{Persistence, StoreError};
use crate::types::{Entry, EntryOrderBy, EntryQuery, EntryStatus, HistoryEntry, StatusCount, User};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct StoreInner {
    entries: HashMap<String, Entry>,
    history: Vec<HistoryEntry>,
    users: HashMap<String, User>,
    counts: StatusCount,
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(name: &str, status_date: DateTime<Utc>, query: &EntryQuery) -> bool {
    if !query.keyword.is_empty()
        && !name
            .to_lowercase()
            .contains(&query.keyword.to_lowercase())
    {
        return false;
    }
    if let Some(from) = query.from {
        if status_date < from {
            return false;
        }
    }
    if let Some(to) = query.to {
        if status_date > to {
            return false;
        }
    }
    true
}

/// Order, then window to the requested page (1-based; page 0 = no paging).
fn order_and_page<T>(
    mut rows: Vec<T>,
    query: &EntryQuery,
    key: impl Fn(&T) -> (i64, DateTime<Utc>, String),
) -> Vec<T> {
    rows.sort_by(|a, b| {
        let (a_id, a_date, a_name) = key(a);
        let (b_id, b_date, b_name) = key(b);
        match query.order_by {
            EntryOrderBy::StatusDateAscending => a_date.cmp(&b_date),
            EntryOrderBy::StatusDateDescending => b_date.cmp(&a_date),
            EntryOrderBy::WorkflowIdAscending => a_id.cmp(&b_id),
            EntryOrderBy::WorkflowIdDescending => b_id.cmp(&a_id),
            EntryOrderBy::NameAscending => a_name.cmp(&b_name),
            EntryOrderBy::NameDescending => b_name.cmp(&a_name),
        }
    });

    if query.page == 0 || query.page_size == 0 {
        return rows;
    }
    rows.into_iter()
        .skip((query.page - 1) * query.page_size)
        .take(query.page_size)
        .collect()
}

impl Persistence for MemoryStore {
    fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn clear_status_count(&self) -> Result<(), StoreError> {
        self.inner.lock().counts = StatusCount::default();
        Ok(())
    }

    fn clear_entries(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.history.clear();
        Ok(())
    }

    fn status_count(&self) -> Result<StatusCount, StoreError> {
        Ok(self.inner.lock().counts)
    }

    fn insert_entry(&self, entry: Entry) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&entry.id) {
            return Err(StoreError::Conflict(entry.id));
        }
        *inner.counts.bucket_mut(entry.status) += 1;
        inner.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn update_entry_status(
        &self,
        id: &str,
        status: EntryStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let Some(mut entry) = inner.entries.get(id).cloned() else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let previous = entry.status;
        entry.status = status;
        entry.status_date = at;
        inner.entries.insert(id.to_string(), entry);

        let old_bucket = inner.counts.bucket_mut(previous);
        *old_bucket = old_bucket.saturating_sub(1);
        *inner.counts.bucket_mut(status) += 1;
        Ok(())
    }

    fn insert_history_entry(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        self.inner.lock().history.push(entry);
        Ok(())
    }

    fn entries(&self, query: &EntryQuery) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.lock();
        let rows: Vec<Entry> = inner
            .entries
            .values()
            .filter(|e| matches_query(&e.name, e.status_date, query))
            .cloned()
            .collect();
        Ok(order_and_page(rows, query, |e| {
            (e.workflow_id, e.status_date, e.name.clone())
        }))
    }

    fn entries_count(&self, query: &EntryQuery) -> Result<u64, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .entries
            .values()
            .filter(|e| matches_query(&e.name, e.status_date, query))
            .count() as u64)
    }

    fn history_entries(&self, query: &EntryQuery) -> Result<Vec<HistoryEntry>, StoreError> {
        let inner = self.inner.lock();
        let rows: Vec<HistoryEntry> = inner
            .history
            .iter()
            .filter(|e| matches_query(&e.name, e.status_date, query))
            .cloned()
            .collect();
        Ok(order_and_page(rows, query, |e| {
            (e.workflow_id, e.status_date, e.name.clone())
        }))
    }

    fn history_entries_count(&self, query: &EntryQuery) -> Result<u64, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .history
            .iter()
            .filter(|e| matches_query(&e.name, e.status_date, query))
            .count() as u64)
    }

    fn entry_status_date_min(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().entries.values().map(|e| e.status_date).min())
    }

    fn entry_status_date_max(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().entries.values().map(|e| e.status_date).max())
    }

    fn history_status_date_min(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().history.iter().map(|e| e.status_date).min())
    }

    fn history_status_date_max(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().history.iter().map(|e| e.status_date).max())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(&user.name) {
            return Err(StoreError::Conflict(user.name));
        }
        inner.users.insert(user.name.clone(), user);
        Ok(())
    }

    fn user(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().users.get(name).cloned())
    }

    fn password(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .inner
            .lock()
            .users
            .get(name)
            .map(|u| u.password.clone()))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
