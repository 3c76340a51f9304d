//! BDD step definitions for the status message feature

use cucumber::{given, then, when};

use buildwatch::message::format_message;
use buildwatch::record::{BuildRecord, BuildStatus};

use crate::world::BuildwatchWorld;

#[given(expr = "a build record with status {string}")]
fn record_with_status(world: &mut BuildwatchWorld, status: String) {
    world.record = Some(BuildRecord::new(BuildStatus::from(status), None));
}

#[given(expr = "a build record with status {string} and conclusion {string}")]
fn record_with_conclusion(world: &mut BuildwatchWorld, status: String, conclusion: String) {
    world.record = Some(BuildRecord::new(
        BuildStatus::from(status),
        Some(conclusion.as_str()),
    ));
}

#[given(expr = "the record is for commit {string} on branch {string}")]
fn record_commit(world: &mut BuildwatchWorld, title: String, branch: String) {
    let record = world.record.as_mut().expect("record not set");
    record.title = title;
    record.branch = branch;
}

#[when(expr = "the message is formatted for project {string}")]
fn format_for_project(world: &mut BuildwatchWorld, project: String) {
    let record = world.record.as_ref().expect("record not set");
    let message = format_message(&project, record);
    assert_eq!(
        message,
        format_message(&project, record),
        "formatting must be deterministic"
    );
    world.message = Some(message);
}

#[then(expr = "the message should contain {string}")]
fn message_contains(world: &mut BuildwatchWorld, expected: String) {
    let message = world.message.as_ref().expect("message not formatted");
    assert!(
        message.text.contains(&expected),
        "Expected message to contain '{}', got '{}'",
        expected,
        message.text
    );
}

#[then("the message should be terminal")]
fn message_terminal(world: &mut BuildwatchWorld) {
    assert!(world.message.as_ref().expect("message not formatted").is_terminal);
}

#[then("the message should not be terminal")]
fn message_not_terminal(world: &mut BuildwatchWorld) {
    assert!(!world.message.as_ref().expect("message not formatted").is_terminal);
}
