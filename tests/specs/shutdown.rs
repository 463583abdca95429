//! Engine shutdown ordering and state clearing.

use crate::prelude::*;
use cog_adapters::FakeRunner;
use cog_core::WatchEvent;
use cog_storage::{Entry, EntryQuery, EntryStatus, Persistence, StatusCount};
use std::time::Duration;

#[tokio::test]
async fn full_shutdown_stops_everything_and_clears_state() {
    let h = harness_with(FakeRunner::holding());
    write_definition(h.dir.path(), "a.xml", &startup_xml(1, "one"));
    write_definition(h.dir.path(), "b.xml", &startup_xml(2, "two"));
    write_definition(h.dir.path(), "c.xml", &periodic_xml(3, "tick", "60s"));

    h.engine.load_all();
    h.engine.run().await;
    settle().await;

    let one = h.engine.get_workflow(1).unwrap();
    let two = h.engine.get_workflow(2).unwrap();
    assert!(one.is_running());
    assert!(two.is_running());

    // seed persisted state so the purge is observable
    h.store
        .insert_entry(Entry {
            id: "seed".to_string(),
            workflow_id: 99,
            name: "seed".to_string(),
            launch_type: cog_core::LaunchType::Periodic,
            status: EntryStatus::Done,
            status_date: chrono::Utc::now(),
        })
        .unwrap();

    h.engine.stop(true, true).await.unwrap();

    // every running workflow received Stop()
    assert!(!one.is_running());
    assert!(!two.is_running());
    assert!(!h.engine.is_started());

    // persistence was purged
    assert_eq!(h.engine.status_count().unwrap(), StatusCount::default());
    assert!(h.engine.entries(&EntryQuery::all()).unwrap().is_empty());

    // no new firings occur after the call returns
    let fired_before = h.runner.start_count();
    h.clock.advance(Duration::from_secs(600));
    settle().await;
    assert_eq!(h.runner.start_count(), fired_before);
}

#[tokio::test]
async fn stop_without_clear_keeps_persisted_state() {
    let h = harness();
    h.store
        .insert_entry(Entry {
            id: "seed".to_string(),
            workflow_id: 1,
            name: "seed".to_string(),
            launch_type: cog_core::LaunchType::Startup,
            status: EntryStatus::Done,
            status_date: chrono::Utc::now(),
        })
        .unwrap();

    h.engine.run().await;
    h.engine.stop(true, false).await.unwrap();

    assert_eq!(h.engine.entries(&EntryQuery::all()).unwrap().len(), 1);
}

#[tokio::test]
async fn engine_can_be_run_again_after_a_scheduler_stop() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path)).await;

    h.engine.stop(true, false).await.unwrap();
    assert!(h.engine.scheduled_job_ids().is_empty());

    // run() reschedules every enabled entry from the registry
    h.engine.run().await;
    assert!(h.engine.is_started());
    assert_eq!(h.engine.scheduled_job_ids(), ["Workflow Job 7"]);

    h.clock.advance(Duration::from_secs(60));
    settle().await;
    assert_eq!(h.runner.started_ids(), vec![7]);
}
