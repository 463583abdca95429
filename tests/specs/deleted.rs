//! Definition file removal tears down the schedule and the registry entry.

use crate::prelude::*;
use cog_adapters::FakeRunner;
use cog_core::WatchEvent;
use std::time::Duration;

#[tokio::test]
async fn deleting_a_cron_workflow_removes_entry_and_job() {
    let h = harness_with(FakeRunner::holding());
    h.engine.run().await;

    let path = write_definition(
        h.dir.path(),
        "hourly.xml",
        &cron_xml(9, "hourly", "0 0 * * * *"),
    );
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;
    assert!(h.engine.job_exists(9));

    h.engine.start_workflow(9);
    settle().await;
    let wf = h.engine.get_workflow(9).unwrap();
    assert!(wf.is_running());

    std::fs::remove_file(&path).unwrap();
    h.engine.reconcile(WatchEvent::Deleted(path)).await;

    assert!(h.engine.get_workflow(9).is_none());
    assert!(!h.engine.job_exists(9));
    assert!(h.engine.scheduled_job_ids().is_empty());
    // Stop() was called on the workflow
    assert!(!wf.is_running());
}

#[tokio::test]
async fn no_firings_after_deletion() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;
    h.engine.reconcile(WatchEvent::Deleted(path)).await;

    h.clock.advance(Duration::from_secs(600));
    settle().await;
    assert_eq!(h.runner.start_count(), 0);
}

#[tokio::test]
async fn deleting_a_never_loaded_file_is_harmless() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "bad.xml", "<Workflow");
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;
    h.engine.reconcile(WatchEvent::Deleted(path)).await;

    assert!(h.engine.workflows().is_empty());
}
