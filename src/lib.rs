//! Telegram Sender Library
//!
//! Sends text messages from a personal Telegram account:
//! - to a single user by handle
//! - interactively, one recipient and message at a time
//! - in bulk from a list file, with a delay between sends and
//!   rate-limit aware retries
//!
//! The account session is persisted by grammers in `<SESSION_NAME>.session`.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod recipient;
pub mod session;
pub mod telegram;

// Re-export common types
pub use config::{Credentials, SenderSettings, Settings};
pub use dispatch::{
    BulkSummary, ClientError, DispatchOutcome, DispatchResult, Dispatcher, Messenger, Pacing,
};
pub use error::{Error, Result};
pub use recipient::Handle;
pub use session::{get_client, SessionLock, TelegramClient};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
