// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query pass-through to the persistence collaborator.
//!
//! Thin delegation so front-ends talk to one engine handle; no caching,
//! no translation beyond the error wrap.

use crate::engine::Engine;
use crate::EngineError;
use chrono::{DateTime, Utc};
use cog_core::Clock;
use cog_storage::{Entry, EntryQuery, HistoryEntry, StatusCount, User};

impl<C: Clock> Engine<C> {
    pub fn status_count(&self) -> Result<StatusCount, EngineError> {
        Ok(self.store.status_count()?)
    }

    pub fn entries(&self, query: &EntryQuery) -> Result<Vec<Entry>, EngineError> {
        Ok(self.store.entries(query)?)
    }

    pub fn entries_count(&self, query: &EntryQuery) -> Result<u64, EngineError> {
        Ok(self.store.entries_count(query)?)
    }

    pub fn history_entries(&self, query: &EntryQuery) -> Result<Vec<HistoryEntry>, EngineError> {
        Ok(self.store.history_entries(query)?)
    }

    pub fn history_entries_count(&self, query: &EntryQuery) -> Result<u64, EngineError> {
        Ok(self.store.history_entries_count(query)?)
    }

    pub fn entry_status_date_min(&self) -> Result<Option<DateTime<Utc>>, EngineError> {
        Ok(self.store.entry_status_date_min()?)
    }

    pub fn entry_status_date_max(&self) -> Result<Option<DateTime<Utc>>, EngineError> {
        Ok(self.store.entry_status_date_max()?)
    }

    pub fn history_status_date_min(&self) -> Result<Option<DateTime<Utc>>, EngineError> {
        Ok(self.store.history_status_date_min()?)
    }

    pub fn history_status_date_max(&self) -> Result<Option<DateTime<Utc>>, EngineError> {
        Ok(self.store.history_status_date_max()?)
    }

    pub fn insert_user(&self, user: User) -> Result<(), EngineError> {
        Ok(self.store.insert_user(user)?)
    }

    pub fn user(&self, name: &str) -> Result<Option<User>, EngineError> {
        Ok(self.store.user(name)?)
    }

    pub fn password(&self, name: &str) -> Result<Option<String>, EngineError> {
        Ok(self.store.password(name)?)
    }
}
