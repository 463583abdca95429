//! Boot: startup workflows launch once, nothing is left in the scheduler.

use crate::prelude::*;

#[tokio::test]
async fn boot_with_three_startup_workflows_starts_each_once() {
    let h = harness();
    for id in 1..=3 {
        write_definition(
            h.dir.path(),
            &format!("wf{id}.xml"),
            &startup_xml(id, &format!("boot-{id}")),
        );
    }

    h.engine.load_all();
    h.engine.run().await;
    settle().await;

    let mut started = h.runner.started_ids();
    started.sort_unstable();
    assert_eq!(started, [1, 2, 3]);

    assert!(h.engine.scheduled_job_ids().is_empty());
    assert!(h.engine.is_started());
}

#[tokio::test]
async fn boot_survives_a_broken_definition() {
    let h = harness();
    write_definition(h.dir.path(), "good.xml", &startup_xml(1, "good"));
    write_definition(h.dir.path(), "bad.xml", "not xml at all");

    h.engine.load_all();
    h.engine.run().await;
    settle().await;

    assert_eq!(h.runner.started_ids(), vec![1]);
    assert_eq!(h.engine.workflows().len(), 1);
}

#[tokio::test]
async fn startup_runs_are_recorded_through_the_persistence_seam() {
    // Same wiring as production: Recorded<_> around the runner.
    use cog_adapters::Recorded;
    use cog_storage::{EntryQuery, EntryStatus};

    let h = harness();
    let recorded = Recorded::new(
        h.runner.clone(),
        std::sync::Arc::clone(&h.store) as std::sync::Arc<dyn cog_storage::Persistence>,
    );
    let engine = cog_engine::Engine::new(cog_engine::EngineDeps {
        settings: cog_definition::Settings {
            workflows_folder: h.dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        },
        store: std::sync::Arc::clone(&h.store) as _,
        runner: std::sync::Arc::new(recorded),
        clock: h.clock.clone(),
    });

    write_definition(h.dir.path(), "boot.xml", &startup_xml(1, "boot"));
    engine.load_all();
    engine.run().await;
    settle().await;

    let entries = engine.entries(&EntryQuery::all()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].workflow_id, 1);
    assert_eq!(entries[0].status, EntryStatus::Done);
    assert_eq!(engine.history_entries_count(&EntryQuery::all()).unwrap(), 1);
}
