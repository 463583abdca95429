//! Live watcher → reconciler flow over a real temp folder.

use crate::prelude::*;
use cog_adapters::DirWatcher;
use cog_core::WatchEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Drain watcher events into the engine until `done` holds or time runs out.
async fn reconcile_until(
    h: &Harness,
    rx: &mut mpsc::Receiver<WatchEvent>,
    done: impl Fn(&Harness) -> bool,
) {
    let deadline = Duration::from_secs(5);
    let result = timeout(deadline, async {
        loop {
            if done(h) {
                return;
            }
            if let Some(event) = rx.recv().await {
                h.engine.reconcile(event).await;
            }
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for reconciliation");
}

#[tokio::test(flavor = "multi_thread")]
async fn file_appearing_on_disk_reaches_the_registry() {
    let h = harness();
    h.engine.load_all();
    h.engine.run().await;

    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = DirWatcher::spawn(h.dir.path(), tx).unwrap();

    write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    reconcile_until(&h, &mut rx, |h| h.engine.get_workflow(7).is_some()).await;

    assert!(h.engine.job_exists(7));
}

#[tokio::test(flavor = "multi_thread")]
async fn file_removal_tears_the_workflow_down() {
    let h = harness();
    h.engine.run().await;

    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = DirWatcher::spawn(h.dir.path(), tx).unwrap();

    let path = write_definition(h.dir.path(), "sync.xml", &periodic_xml(7, "sync", "60s"));
    reconcile_until(&h, &mut rx, |h| h.engine.get_workflow(7).is_some()).await;

    std::fs::remove_file(&path).unwrap();
    reconcile_until(&h, &mut rx, |h| h.engine.get_workflow(7).is_none()).await;

    assert!(!h.engine.job_exists(7));
}
