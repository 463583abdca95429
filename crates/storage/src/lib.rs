// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cog-storage: Persistence collaborator for the Cogwheel engine.
//!
//! The engine core treats persistence as an interface: run entries,
//! history, status counts and users are written and queried through the
//! [`Persistence`] trait. [`MemoryStore`] is the in-process
//! implementation; database-backed stores plug in behind the same trait.

mod memory;
mod store;
mod types;

pub use memory::MemoryStore;
pub use store::{Persistence, StoreError};
pub use types::{
    Entry, EntryOrderBy, EntryQuery, EntryStatus, HistoryEntry, StatusCount, User,
};
