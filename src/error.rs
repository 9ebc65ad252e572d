//! Error types for the Telegram sender

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required credentials: {0}")]
    MissingCredentials(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Errors that mean the session itself is unusable; the run cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingCredentials(_)
                | Error::AuthenticationFailed(_)
                | Error::SessionLocked
                | Error::SessionError(_)
        )
    }

    /// Follow-up advice printed next to the error, if there is any.
    pub fn remediation(&self, session_file: &str) -> Option<String> {
        match self {
            Error::MissingCredentials(_) => Some(
                "Create a .env file with API_ID, API_HASH and PHONE_NUMBER (see .env.example)"
                    .to_string(),
            ),
            Error::AuthenticationFailed(_) => Some(format!(
                "Delete the session file '{}' and run again to log in anew",
                session_file
            )),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
