// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for engine tests.

use crate::engine::{Engine, EngineConfig, EngineDeps};
use cog_adapters::FakeRunner;
use cog_core::FakeClock;
pub use cog_core::Clock;
use cog_definition::Settings;
use cog_storage::MemoryStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct TestEngine {
    pub engine: Engine<FakeClock>,
    pub clock: FakeClock,
    pub runner: FakeRunner,
    pub store: Arc<MemoryStore>,
    pub dir: tempfile::TempDir,
}

pub(crate) fn test_engine() -> TestEngine {
    test_engine_with(FakeRunner::new())
}

pub(crate) fn test_engine_with(runner: FakeRunner) -> TestEngine {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::new();
    let store = Arc::new(MemoryStore::new());
    let settings = Settings {
        workflows_folder: dir.path().to_string_lossy().into_owned(),
        ..Default::default()
    };
    let engine = Engine::with_config(
        EngineDeps {
            settings,
            store: Arc::clone(&store) as Arc<dyn cog_storage::Persistence>,
            runner: Arc::new(runner.clone()),
            clock: clock.clone(),
        },
        EngineConfig {
            timer_check: Duration::from_millis(10),
        },
    );
    TestEngine {
        engine,
        clock,
        runner,
        store,
        dir,
    }
}

pub(crate) fn write_definition(dir: &Path, file: &str, xml: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, xml).unwrap();
    path
}

pub(crate) fn startup_xml(id: i64, name: &str) -> String {
    format!(
        r#"<Workflow id="{id}" name="{name}">
  <Settings>
    <Setting name="launchType" value="startup"/>
    <Setting name="enabled" value="true"/>
  </Settings>
</Workflow>"#
    )
}

pub(crate) fn periodic_xml(id: i64, name: &str, period: &str) -> String {
    format!(
        r#"<Workflow id="{id}" name="{name}">
  <Settings>
    <Setting name="launchType" value="periodic"/>
    <Setting name="enabled" value="true"/>
    <Setting name="period" value="{period}"/>
  </Settings>
</Workflow>"#
    )
}

pub(crate) fn cron_xml(id: i64, name: &str, expression: &str) -> String {
    format!(
        r#"<Workflow id="{id}" name="{name}">
  <Settings>
    <Setting name="launchType" value="cron"/>
    <Setting name="enabled" value="true"/>
    <Setting name="cronExpression" value="{expression}"/>
  </Settings>
</Workflow>"#
    )
}

pub(crate) fn disabled_xml(id: i64, name: &str) -> String {
    format!(
        r#"<Workflow id="{id}" name="{name}">
  <Settings>
    <Setting name="launchType" value="periodic"/>
    <Setting name="enabled" value="false"/>
    <Setting name="period" value="60s"/>
  </Settings>
</Workflow>"#
    )
}

/// Let spawned workflow tasks and the driver make progress.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
