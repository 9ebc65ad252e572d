//! Tests for bulk command

use std::time::Duration;

use telegram_sender::commands::bulk;
use telegram_sender::{DispatchResult, Dispatcher, Error, Pacing};

use super::FakeMessenger;

fn no_delay() -> Pacing {
    Pacing {
        delay: Duration::ZERO,
        flood_retries: 1,
    }
}

#[tokio::test]
async fn test_bulk_skips_blank_lines() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("users.txt");
    std::fs::write(&path, "@a\n\nb\n").unwrap();

    let handles = bulk::load(&path).unwrap();
    let messenger = FakeMessenger::default();
    let dispatcher = Dispatcher::new(&messenger, no_delay());

    let summary = bulk::run(&dispatcher, &handles, "hi").await.unwrap();

    assert_eq!(messenger.resolved(), vec!["a", "b"]);
    assert_eq!(
        *messenger.sent.borrow(),
        vec![("a".to_string(), "hi".to_string()), ("b".to_string(), "hi".to_string())]
    );
    assert_eq!(summary.total, 2);
    assert!(summary.all_sent());
}

#[tokio::test]
async fn test_bulk_outcomes_follow_input_order() {
    let messenger = FakeMessenger::default().with_unknown("bob");
    let dispatcher = Dispatcher::new(&messenger, no_delay());
    let handles = telegram_sender::recipient::parse_handles("alice\n@bob\ncarol\n");

    let outcomes = dispatcher.send_bulk(&handles, "hi").await.unwrap();

    let names: Vec<&str> = outcomes.iter().map(|o| o.handle.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert_eq!(outcomes[1].result, DispatchResult::NotFound);
    assert_eq!(messenger.sent_to(), vec!["alice", "carol"]);
}

#[tokio::test]
async fn test_bulk_summary_reports_failures() {
    let messenger = FakeMessenger::default()
        .with_unknown("ghost")
        .with_send_result(
            "carol",
            Err(telegram_sender::ClientError::Unknown("USER_IS_BLOCKED (400)".into())),
        );
    let dispatcher = Dispatcher::new(&messenger, no_delay());
    let handles = telegram_sender::recipient::parse_handles("alice\nghost\ncarol\n");

    let summary = bulk::run(&dispatcher, &handles, "hi").await.unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_sent());
    assert!(summary.to_string().contains("@ghost, @carol"));
}

#[test]
fn test_bulk_load_rejects_empty_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("users.txt");
    std::fs::write(&path, "\n\n").unwrap();

    assert!(matches!(bulk::load(&path), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_bulk_load_missing_file() {
    assert!(bulk::load(std::path::Path::new("/nonexistent/list.txt")).is_err());
}
