//! Tests for init_session command

use telegram_sender::commands::init_session::is_confirmed;

#[test]
fn test_init_session_confirmation_yes() {
    assert!(is_confirmed("YES"));
}

#[test]
fn test_init_session_confirmation_no() {
    assert!(!is_confirmed("no"));
    assert!(!is_confirmed(""));
}

#[test]
fn test_init_session_confirmation_case_sensitive() {
    assert!(!is_confirmed("yes"));
    assert!(!is_confirmed("Yes"));
}

#[test]
fn test_init_session_trimming() {
    assert!(is_confirmed(" YES "));
    assert!(is_confirmed("YES\n"));
}

#[tokio::test]
#[ignore] // Requires Telegram credentials and user interaction
async fn test_init_session_run() {
    use telegram_sender::commands::init_session;
    use telegram_sender::Settings;

    let settings = Settings::load("config.yml").expect("credentials");
    init_session::run(&settings.credentials)
        .await
        .expect("session initialized");
}
