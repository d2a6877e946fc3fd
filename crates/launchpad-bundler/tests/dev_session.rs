//! Debounced dev rebuilds.

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::{FlakyBundler, Log, RecordingBundler, project, resolve};
use launchpad_bundler::{DevSession, DevSummary, Orchestrator};
use launchpad_config::{ContextInput, events};
use tokio::sync::mpsc;

#[tokio::test]
async fn burst_of_changes_triggers_one_rebuild() {
    let root = project();
    let ctx = Arc::new(resolve(root.path(), ContextInput::with_preset("dev")));
    let bundler = RecordingBundler::default();
    let session = DevSession::new(Orchestrator::new(Arc::new(bundler.clone())), ctx)
        .with_debounce(Duration::from_millis(50));

    let (tx, rx) = mpsc::channel(16);
    for name in ["a.vue", "b.vue", "a.vue", "c.js"] {
        tx.send(PathBuf::from(name)).await.expect("send");
    }
    drop(tx);

    let summary = session.run(rx).await.expect("session");
    assert_eq!(summary, DevSummary { builds: 2, failures: 0 });
    assert_eq!(bundler.calls(), 2);
}

#[tokio::test]
async fn changes_after_a_rebuild_started_get_their_own_rebuild() {
    let root = project();
    let ctx = Arc::new(resolve(root.path(), ContextInput::with_preset("dev")));
    let bundler = RecordingBundler::default();
    let session = DevSession::new(Orchestrator::new(Arc::new(bundler.clone())), ctx)
        .with_debounce(Duration::from_millis(20));

    let (tx, rx) = mpsc::channel(16);
    let calls = bundler.clone();
    let feeder = tokio::spawn(async move {
        tx.send(PathBuf::from("pages/index.vue")).await.expect("send");
        while calls.calls() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tx.send(PathBuf::from("pages/about.vue")).await.expect("send");
    });

    let summary = session.run(rx).await.expect("session");
    feeder.await.expect("feeder");
    assert_eq!(summary.builds, 3);
    assert_eq!(bundler.calls(), 3);
}

#[tokio::test]
async fn compilation_errors_keep_the_session_alive() {
    let root = project();
    let ctx = Arc::new(resolve(root.path(), ContextInput::with_preset("dev")));
    let bundler = Arc::new(FlakyBundler::new(1));
    let session = DevSession::new(Orchestrator::new(bundler.clone()), ctx)
        .with_debounce(Duration::from_millis(10));

    let (tx, rx) = mpsc::channel(4);
    tx.send(PathBuf::from("fixed.vue")).await.expect("send");
    drop(tx);

    let summary = session.run(rx).await.expect("session survives");
    assert_eq!(summary, DevSummary { builds: 2, failures: 1 });
    assert_eq!(bundler.inner.calls(), 1);
}

#[tokio::test]
async fn host_hooks_hear_about_successful_rebuilds_and_close_runs() {
    let root = project();
    let log = Log::default();
    let input = ContextInput {
        hooks: log.hooks("build", &[events::CLOSE]),
        host_hooks: log.hooks("host", &[events::DEV_COMPILED]),
        ..ContextInput::with_preset("dev")
    };
    let ctx = Arc::new(resolve(root.path(), input));
    let session = DevSession::new(
        Orchestrator::new(Arc::new(RecordingBundler::default())),
        ctx,
    );

    let (tx, rx) = mpsc::channel(1);
    drop(tx);
    session.run(rx).await.expect("session");

    assert_eq!(log.entries(), vec!["host:dev:compiled", "build:close"]);
}
