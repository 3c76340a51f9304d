//! BDD step definitions for the monitor loop feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use buildwatch::engine::{Engine, RunOutcome, RunState};
use buildwatch::notifier::NotificationDispatcher;
use buildwatch::record::{BuildRecord, BuildStatus};

use crate::fakes::{RecordingNotifier, ScriptedFetcher};
use crate::world::BuildwatchWorld;

struct Harness {
    engine: Engine,
    fetcher: Arc<ScriptedFetcher>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(world: &BuildwatchWorld) -> Harness {
    let cancel = CancellationToken::new();
    let fetcher = Arc::new(ScriptedFetcher::new(world.script.clone(), cancel.clone()));
    let notifier = Arc::new(RecordingNotifier::new(world.webhook_rejects));
    let engine = Engine::new(
        fetcher.clone(),
        NotificationDispatcher::new("Lightning Search", notifier.clone()),
        Duration::from_millis(1),
        cancel,
    );
    Harness {
        engine,
        fetcher,
        notifier,
    }
}

#[given(expr = "the provider reports a build {string}")]
fn provider_reports(world: &mut BuildwatchWorld, status: String) {
    world
        .script
        .push(Some(BuildRecord::new(BuildStatus::from(status), None)));
}

#[given(expr = "the provider reports a build {string} with conclusion {string}")]
fn provider_reports_with_conclusion(world: &mut BuildwatchWorld, status: String, conclusion: String) {
    world.script.push(Some(BuildRecord::new(
        BuildStatus::from(status),
        Some(conclusion.as_str()),
    )));
}

#[given("the provider fails")]
fn provider_fails(world: &mut BuildwatchWorld) {
    world.script.push(None);
}

#[given("the chat webhook rejects messages")]
fn webhook_rejects(world: &mut BuildwatchWorld) {
    world.webhook_rejects = true;
}

#[when(expr = "the monitor polls {int} time(s)")]
async fn monitor_polls(world: &mut BuildwatchWorld, count: u32) {
    let mut h = harness(world);
    for _ in 0..count {
        let tick = h.engine.tick().await;
        world.ticks.push(tick);
    }
    world.sent = h.notifier.messages().await;
    world.fetch_calls = h.fetcher.call_count().await;
}

#[when("the monitor runs until it stops")]
async fn monitor_runs(world: &mut BuildwatchWorld) {
    let mut h = harness(world);
    let outcome = tokio::time::timeout(Duration::from_secs(5), h.engine.run())
        .await
        .expect("monitor loop did not stop");
    world.outcome = Some(outcome);
    world.sent = h.notifier.messages().await;
    world.fetch_calls = h.fetcher.call_count().await;
}

#[then(expr = "{int} notification(s) should be dispatched")]
fn notifications_dispatched(world: &mut BuildwatchWorld, count: usize) {
    assert_eq!(
        world.sent.len(),
        count,
        "Expected {} notifications, got {:?}",
        count,
        world.sent
    );
}

#[then(expr = "notification {int} should contain {string}")]
fn notification_contains(world: &mut BuildwatchWorld, index: usize, expected: String) {
    let message = world
        .sent
        .get(index - 1)
        .unwrap_or_else(|| panic!("no notification #{}", index));
    assert!(
        message.contains(&expected),
        "Expected notification #{} to contain '{}', got '{}'",
        index,
        expected,
        message
    );
}

#[then("monitoring should still be running")]
fn still_running(world: &mut BuildwatchWorld) {
    let last = world.ticks.last().expect("no polls recorded");
    assert_eq!(last.run_state(), RunState::Running);
}

#[then("monitoring should have stopped")]
fn has_stopped(world: &mut BuildwatchWorld) {
    match (&world.outcome, world.ticks.last()) {
        (Some(outcome), _) => assert_eq!(*outcome, RunOutcome::Completed),
        (None, Some(tick)) => assert_eq!(tick.run_state(), RunState::Stopped),
        (None, None) => panic!("monitor never ran"),
    }
}

#[then("monitoring should have been cancelled")]
fn was_cancelled(world: &mut BuildwatchWorld) {
    assert_eq!(world.outcome, Some(RunOutcome::Cancelled));
}

#[then(expr = "the provider should have been polled {int} time(s)")]
fn provider_polled(world: &mut BuildwatchWorld, count: u32) {
    assert_eq!(world.fetch_calls, count);
}
