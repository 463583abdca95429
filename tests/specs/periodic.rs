//! A periodic workflow added while the engine is running.

use crate::prelude::*;
use cog_core::WatchEvent;
use std::time::Duration;

#[tokio::test]
async fn periodic_workflow_added_while_running_is_scheduled() {
    let h = harness();
    h.engine.load_all();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path)).await;

    assert!(h.engine.get_workflow(7).is_some());
    assert_eq!(h.engine.scheduled_job_ids(), ["Workflow Job 7"]);

    // first firing is at most 60s away
    let deadline = h.engine.next_deadline_ms().unwrap();
    assert!(deadline > h.clock.epoch_ms());
    assert!(deadline <= h.clock.epoch_ms() + 60_000);
}

#[tokio::test]
async fn periodic_workflow_fires_every_period() {
    let h = harness();
    h.engine.run().await;

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    h.engine.reconcile(WatchEvent::Created(path)).await;

    for expected in 1..=3u64 {
        h.clock.advance(Duration::from_secs(60));
        settle().await;
        assert_eq!(h.runner.start_count(), expected as usize);
    }
    assert_eq!(h.runner.started_ids(), vec![7, 7, 7]);
}

#[tokio::test]
async fn cron_workflow_fires_on_its_schedule() {
    let h = harness();
    h.engine.run().await;

    // clock starts at epoch_ms 1_000_000 (1970-01-01T00:16:40Z);
    // the top of the hour is 2_600 seconds away
    let path = write_definition(
        h.dir.path(),
        "hourly.xml",
        &cron_xml(9, "hourly", "0 0 * * * *"),
    );
    h.engine.reconcile(WatchEvent::Created(path)).await;
    assert_eq!(h.engine.next_deadline_ms(), Some(3_600_000));

    h.clock.advance(Duration::from_secs(2_599));
    settle().await;
    assert_eq!(h.runner.start_count(), 0);

    h.clock.advance(Duration::from_secs(1));
    settle().await;
    assert_eq!(h.runner.started_ids(), vec![9]);

    // and the next occurrence is the following hour
    assert_eq!(h.engine.next_deadline_ms(), Some(7_200_000));
}
