//! Tests for single-send command

use std::time::Duration;

use telegram_sender::commands::send_message;
use telegram_sender::{ClientError, DispatchResult, Dispatcher, Pacing};

use super::FakeMessenger;

fn pacing() -> Pacing {
    Pacing {
        delay: Duration::from_secs(1),
        flood_retries: 1,
    }
}

#[tokio::test]
async fn test_send_message_success() {
    let messenger = FakeMessenger::default();
    let dispatcher = Dispatcher::new(&messenger, pacing());

    let result = send_message::run(&dispatcher, "@alice", "hello").await.unwrap();

    assert!(result.is_sent());
    assert_eq!(messenger.sent_to(), vec!["alice"]);
}

#[tokio::test]
async fn test_send_message_handle_forms_resolve_identically() {
    let messenger = FakeMessenger::default();
    let dispatcher = Dispatcher::new(&messenger, pacing());

    send_message::run(&dispatcher, "@alice", "one").await.unwrap();
    send_message::run(&dispatcher, "alice", "two").await.unwrap();

    assert_eq!(messenger.resolved(), vec!["alice", "alice"]);
}

#[tokio::test]
async fn test_send_message_four_char_handle_is_resolved() {
    let messenger = FakeMessenger::default();
    let dispatcher = Dispatcher::new(&messenger, pacing());

    let result = send_message::run(&dispatcher, "@abcd", "hello").await.unwrap();

    assert!(telegram_sender::Handle::new("@abcd").is_valid_username());
    assert_eq!(messenger.resolved(), vec!["abcd"]);
    assert!(result.is_sent());
}

#[tokio::test]
async fn test_send_message_rate_limited_is_not_sent() {
    let messenger = FakeMessenger::default()
        .with_send_result("alice", Err(ClientError::RateLimited(Duration::from_secs(5))));
    let dispatcher = Dispatcher::new(&messenger, pacing());

    let result = send_message::run(&dispatcher, "alice", "hello").await.unwrap();

    assert_eq!(
        result,
        DispatchResult::RateLimited {
            retry_after: Duration::from_secs(5)
        }
    );
    assert!(!result.is_sent());
}

#[tokio::test]
async fn test_send_message_unknown_user() {
    let messenger = FakeMessenger::default().with_unknown("nobody_here");
    let dispatcher = Dispatcher::new(&messenger, pacing());

    let result = send_message::run(&dispatcher, "@nobody_here", "hello").await.unwrap();

    assert_eq!(result, DispatchResult::NotFound);
    assert!(messenger.sent_to().is_empty());
}
