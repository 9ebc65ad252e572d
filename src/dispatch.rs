//! Message dispatch
//!
//! Provides:
//! - [`Messenger`], the seam to the Telegram client (resolve + send)
//! - [`Dispatcher`] with single, bulk and interactive send modes
//! - per-recipient outcome classification ([`DispatchResult`])
//!
//! Per-recipient failures never abort a batch; only an authorization
//! failure (the session itself was rejected) is returned as an error.

use std::fmt;
use std::io::{BufRead, Write};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::SenderSettings;
use crate::error::{Error, Result};
use crate::recipient::Handle;

/// Errors reported by a [`Messenger`], already translated from the client library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("not found")]
    NotFound,

    #[error("rate limited for {}s", .0.as_secs())]
    RateLimited(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("authorization rejected: {0}")]
    AuthFailed(String),

    #[error("{0}")]
    Unknown(String),
}

/// The account-backed messaging client.
#[async_trait(?Send)]
pub trait Messenger {
    /// Resolved recipient entity.
    type Peer;

    async fn resolve(&self, handle: &Handle) -> std::result::Result<Self::Peer, ClientError>;

    async fn send(&self, peer: &Self::Peer, text: &str) -> std::result::Result<(), ClientError>;
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Sent,
    NotFound,
    RateLimited { retry_after: Duration },
    Failed { reason: String },
}

impl DispatchResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchResult::Sent)
    }

    /// One line for the terminal.
    pub fn status_line(&self) -> String {
        match self {
            DispatchResult::Sent => "✅ Message sent successfully!".to_string(),
            DispatchResult::NotFound => "❌ User not found".to_string(),
            DispatchResult::RateLimited { retry_after } => format!(
                "⏳ Rate limited by Telegram, retry after {}s",
                retry_after.as_secs()
            ),
            DispatchResult::Failed { reason } => format!("❌ Failed to send message: {}", reason),
        }
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchResult::Sent => write!(f, "sent"),
            DispatchResult::NotFound => write!(f, "not found"),
            DispatchResult::RateLimited { retry_after } => {
                write!(f, "rate limited ({}s)", retry_after.as_secs())
            }
            DispatchResult::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

impl From<ClientError> for DispatchResult {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound => DispatchResult::NotFound,
            ClientError::RateLimited(retry_after) => DispatchResult::RateLimited { retry_after },
            ClientError::Network(_) | ClientError::AuthFailed(_) | ClientError::Unknown(_) => {
                DispatchResult::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// A recipient together with its final result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub handle: Handle,
    pub result: DispatchResult,
}

/// Delay between bulk sends and how often a rate-limited recipient is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub delay: Duration,
    pub flood_retries: u32,
}

impl From<&SenderSettings> for Pacing {
    fn from(settings: &SenderSettings) -> Self {
        Self {
            delay: settings.delay,
            flood_retries: settings.flood_retries,
        }
    }
}

/// Sequential dispatcher over a borrowed messenger.
pub struct Dispatcher<'a, M: Messenger> {
    messenger: &'a M,
    pacing: Pacing,
}

impl<'a, M: Messenger> Dispatcher<'a, M> {
    pub fn new(messenger: &'a M, pacing: Pacing) -> Self {
        Self { messenger, pacing }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Resolve `handle` and send `text` to it.
    ///
    /// Returns `Err` only when the session was rejected.
    pub async fn send_one(&self, handle: &Handle, text: &str) -> Result<DispatchResult> {
        let attempt = match self.messenger.resolve(handle).await {
            Ok(peer) => self.messenger.send(&peer, text).await,
            Err(
                err @ (ClientError::NotFound
                | ClientError::RateLimited(_)
                | ClientError::AuthFailed(_)),
            ) => Err(err),
            Err(err) => {
                warn!(%handle, "Could not resolve: {}", err);
                Err(ClientError::NotFound)
            }
        };

        let result = match attempt {
            Ok(()) => DispatchResult::Sent,
            Err(ClientError::AuthFailed(reason)) => {
                error!(%handle, "Session rejected by Telegram: {}", reason);
                return Err(Error::AuthenticationFailed(reason));
            }
            Err(err) => DispatchResult::from(err),
        };

        match &result {
            DispatchResult::Sent => info!(%handle, outcome = %result, "Message sent"),
            _ => warn!(%handle, outcome = %result, "Message not sent"),
        }
        Ok(result)
    }

    /// Send `text` to every handle in order, pausing between sends.
    ///
    /// Output has the same length and order as `handles`.
    pub async fn send_bulk(&self, handles: &[Handle], text: &str) -> Result<Vec<DispatchOutcome>> {
        let mut outcomes = Vec::with_capacity(handles.len());

        for (index, handle) in handles.iter().enumerate() {
            let is_last = index + 1 == handles.len();
            let mut retries_left = self.pacing.flood_retries;
            let mut waited = false;
            let mut result = self.send_one(handle, text).await?;

            loop {
                let retry_after = match &result {
                    DispatchResult::RateLimited { retry_after } => *retry_after,
                    _ => break,
                };
                if retries_left == 0 && is_last {
                    break;
                }

                let wait = retry_after.saturating_add(self.pacing.delay);
                warn!(%handle, wait_secs = wait.as_secs(), "Rate limited, waiting");
                sleep(wait).await;

                if retries_left == 0 {
                    waited = true;
                    break;
                }
                retries_left -= 1;
                info!(%handle, "Retrying after rate limit");
                result = self.send_one(handle, text).await?;
            }

            outcomes.push(DispatchOutcome {
                handle: handle.clone(),
                result,
            });

            if !is_last && !waited && !self.pacing.delay.is_zero() {
                sleep(self.pacing.delay).await;
            }
        }

        let sent = outcomes.iter().filter(|o| o.result.is_sent()).count();
        info!(
            "Bulk messaging complete: {}/{} successful",
            sent,
            outcomes.len()
        );
        Ok(outcomes)
    }

    /// Read `(handle, message)` pairs from `input` until `quit`/`exit` or end of input.
    pub async fn send_interactive<R, W>(&self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(output, "Type 'quit' or 'exit' to stop")?;

        loop {
            let Some(line) = prompt(input, output, "\nEnter username (with or without @): ")?
            else {
                writeln!(output, "\nExiting...")?;
                break;
            };
            if is_exit_command(&line) {
                break;
            }

            let handle = Handle::new(&line);
            if handle.is_empty() {
                writeln!(output, "Please enter a valid username")?;
                continue;
            }

            let Some(message) = prompt(input, output, "Enter message: ")? else {
                writeln!(output, "\nExiting...")?;
                break;
            };
            let message = message.trim();
            if message.is_empty() {
                writeln!(output, "Please enter a message")?;
                continue;
            }

            writeln!(output, "Sending message to {}...", handle)?;
            output.flush()?;
            let result = self.send_one(&handle, message).await?;
            writeln!(output, "{}", result.status_line())?;
        }

        output.flush()?;
        Ok(())
    }
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "quit" | "exit")
}

/// Print `label` and read one line; `None` on end of input.
fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Per-outcome counts for a finished batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkSummary {
    pub total: usize,
    pub sent: usize,
    pub not_found: usize,
    pub rate_limited: usize,
    pub failed: usize,
    pub unsent: Vec<Handle>,
}

impl BulkSummary {
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let mut summary = BulkSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.result {
                DispatchResult::Sent => summary.sent += 1,
                DispatchResult::NotFound => summary.not_found += 1,
                DispatchResult::RateLimited { .. } => summary.rate_limited += 1,
                DispatchResult::Failed { .. } => summary.failed += 1,
            }
            if !outcome.result.is_sent() {
                summary.unsent.push(outcome.handle.clone());
            }
        }
        summary
    }

    pub fn all_sent(&self) -> bool {
        self.sent == self.total
    }
}

impl fmt::Display for BulkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results ({} total):", self.total)?;
        writeln!(f, "✅ Sent: {}", self.sent)?;
        writeln!(f, "❓ Not found: {}", self.not_found)?;
        writeln!(f, "⏳ Rate limited: {}", self.rate_limited)?;
        write!(f, "❌ Failed: {}", self.failed)?;

        if !self.unsent.is_empty() {
            let names: Vec<String> = self.unsent.iter().map(Handle::to_string).collect();
            write!(f, "\nNot sent: {}", names.join(", "))?;
        }
        Ok(())
    }
}
