//! Definition file edits: remove-then-reload with a replaced trigger.

use crate::prelude::*;
use cog_adapters::FakeRunner;
use cog_core::WatchEvent;
use std::time::Duration;

#[tokio::test]
async fn edit_replaces_workflow_and_trigger() {
    let h = harness_with(FakeRunner::holding());
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;

    // keep the old value observably running
    h.engine.start_workflow(7);
    settle().await;
    let old = h.engine.get_workflow(7).unwrap();
    assert!(old.is_running());

    h.clock.advance(Duration::from_secs(30));
    write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "10s"));
    h.engine.reconcile(WatchEvent::Changed(path)).await;

    // exactly one id=7 whose period is 10s
    let workflows = h.engine.workflows();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].id, 7);
    assert_eq!(workflows[0].period, Some(Duration::from_secs(10)));

    // Stop() was called on the old value
    assert!(!old.is_running());

    // the job was replaced: new trigger, new start time
    assert_eq!(h.engine.scheduled_job_ids(), ["Workflow Job 7"]);
    assert_eq!(
        h.engine.next_deadline_ms(),
        Some(h.clock.epoch_ms() + 10_000)
    );
}

#[tokio::test]
async fn delete_then_create_same_id_replaces_the_job() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;
    let first_deadline = h.engine.next_deadline_ms().unwrap();

    h.clock.advance(Duration::from_secs(20));
    h.engine.reconcile(WatchEvent::Deleted(path.clone())).await;
    write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path)).await;

    // registry indistinguishable from a no-op...
    let workflows = h.engine.workflows();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].id, 7);
    assert_eq!(workflows[0].period, Some(Duration::from_secs(60)));

    // ...but the job was replaced with a fresh trigger start time
    let second_deadline = h.engine.next_deadline_ms().unwrap();
    assert_eq!(second_deadline, first_deadline + 20_000);
}

#[tokio::test]
async fn broken_edit_drops_the_workflow_until_the_next_change() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path.clone())).await;

    write_definition(h.dir.path(), "sync.xml", "<Workflow id=\"7\"");
    h.engine.reconcile(WatchEvent::Changed(path.clone())).await;
    assert!(h.engine.workflows().is_empty());
    assert!(h.engine.scheduled_job_ids().is_empty());

    // a manual re-save recovers it
    write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Changed(path)).await;
    assert!(h.engine.get_workflow(7).is_some());
    assert_eq!(h.engine.scheduled_job_ids(), ["Workflow Job 7"]);
}
