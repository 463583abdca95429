//! Shared fixture for engine specs.

use cog_adapters::FakeRunner;
use cog_core::FakeClock;
pub use cog_core::Clock;
use cog_definition::Settings;
use cog_engine::{Engine, EngineConfig, EngineDeps};
use cog_storage::{MemoryStore, Persistence};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub struct Harness {
    pub engine: Engine<FakeClock>,
    pub clock: FakeClock,
    pub runner: FakeRunner,
    pub store: Arc<MemoryStore>,
    pub dir: tempfile::TempDir,
}

/// Engine over a fresh temp workflows folder, 10ms driver resolution.
pub fn harness() -> Harness {
    harness_with(FakeRunner::new())
}

pub fn harness_with(runner: FakeRunner) -> Harness {
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
            store: Arc::clone(&store) as Arc<dyn Persistence>,
            runner: Arc::new(runner.clone()),
            clock: clock.clone(),
        },
        EngineConfig {
            timer_check: Duration::from_millis(10),
        },
    );
    Harness {
        engine,
        clock,
        runner,
        store,
        dir,
    }
}

pub fn write_definition(dir: &Path, file: &str, xml: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, xml).unwrap();
    path
}

pub fn startup_xml(id: i64, name: &str) -> String {
    format!(
        r#"<Workflow id="{id}" name="{name}">
  <Settings>
    <Setting name="launchType" value="startup"/>
    <Setting name="enabled" value="true"/>
  </Settings>
</Workflow>"#
    )
}

pub fn periodic_xml(id: i64, name: &str, period: &str) -> String {
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

pub fn cron_xml(id: i64, name: &str, expression: &str) -> String {
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

/// Let spawned workflow tasks and the scheduler driver make progress.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
