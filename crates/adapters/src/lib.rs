// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the workflows-folder watcher and the
//! task-runner implementations behind the engine's execution seam.

mod env;
pub mod runner;
pub mod watcher;

pub use runner::{NoopRunner, Recorded};
pub use watcher::{DirWatcher, WatchError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use runner::FakeRunner;
