//! Two definition files claiming the same workflow id.

use crate::prelude::*;
use cog_core::WatchEvent;

#[tokio::test]
async fn second_file_with_the_same_id_loses() {
    let h = harness();
    h.engine.run().await;

    let a = write_definition(h.dir.path(), "a.xml", &periodic_xml(7, "original", "60s"));
    h.engine.reconcile(WatchEvent::Created(a.clone())).await;
    let deadline_before = h.engine.next_deadline_ms();

    let b = write_definition(h.dir.path(), "b.xml", &periodic_xml(7, "pretender", "10s"));
    h.engine.reconcile(WatchEvent::Created(b)).await;

    // registry still holds only the a.xml entry
    let workflows = h.engine.workflows();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].name, "original");
    assert_eq!(workflows[0].file_path, a);

    // and "Workflow Job 7" remains the a.xml binding
    assert_eq!(h.engine.scheduled_job_ids(), ["Workflow Job 7"]);
    assert_eq!(h.engine.next_deadline_ms(), deadline_before);
}

#[tokio::test]
async fn colliding_file_can_rejoin_after_a_fixing_change() {
    let h = harness();
    h.engine.run().await;

    let a = write_definition(h.dir.path(), "a.xml", &periodic_xml(7, "original", "60s"));
    let b = write_definition(h.dir.path(), "b.xml", &periodic_xml(7, "pretender", "10s"));
    h.engine.reconcile(WatchEvent::Created(a)).await;
    h.engine.reconcile(WatchEvent::Created(b.clone())).await;

    // the operator fixes b.xml to use its own id
    write_definition(h.dir.path(), "b.xml", &periodic_xml(8, "fixed", "10s"));
    h.engine.reconcile(WatchEvent::Changed(b)).await;

    let mut ids: Vec<i64> = h.engine.workflows().iter().map(|w| w.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, [7, 8]);

    let mut jobs = h.engine.scheduled_job_ids();
    jobs.sort();
    assert_eq!(jobs, ["Workflow Job 7", "Workflow Job 8"]);
}
