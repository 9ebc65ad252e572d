//! Session management for Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Client creation from the on-disk session
//! - Interactive login when the session is not yet authorized

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::{Client, SignInError};
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Credentials;
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on `path`.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                lock_file: Some(lock_file),
            }),
            Err(_) => {
                eprintln!(
                    r#"
⚠️  ERROR: the Telegram session is already in use by another process!

Telegram expects requests from one session to be sequential.
Wait for the other run to finish and try again.
"#
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open (or create) the session database for `credentials`.
pub fn open_session(credentials: &Credentials) -> Result<Arc<SqliteSession>> {
    let session_file = credentials.session_file();
    let session = SqliteSession::open(&session_file)
        .map_err(|e| Error::SessionError(format!("Failed to open {}: {}", session_file, e)))?;
    Ok(Arc::new(session))
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    _handle: SenderPoolHandle,
    _session: Arc<SqliteSession>,
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Connect using the session file named by `credentials`.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        let session = open_session(credentials)?;
        let pool = SenderPool::new(session.clone(), credentials.api_id);

        // Create client from pool (need reference to whole pool)
        let client = Client::new(&pool);

        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        info!(session = %credentials.session_file(), "Connected to Telegram");

        Ok(Self {
            client,
            _handle: handle,
            _session: session,
            _updates: updates,
            runner_handle,
        })
    }

    /// Stop the network runner.
    pub fn disconnect(self) {
        self.runner_handle.abort();
        info!("Disconnected from Telegram");
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Make sure the session is logged in, running the code/password flow on the
/// terminal if it is not.
pub async fn authorize(client: &Client, credentials: &Credentials) -> Result<()> {
    let authorized = client
        .is_authorized()
        .await
        .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;

    if !authorized {
        warn!("Session {} is not authorized, logging in", credentials.session_file());
        sign_in(client, credentials).await?;
    }

    let me = client
        .get_me()
        .await
        .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;
    info!(
        "Logged in as: {} (@{})",
        me.full_name(),
        me.username().unwrap_or("no username")
    );
    Ok(())
}

async fn sign_in(client: &Client, credentials: &Credentials) -> Result<()> {
    println!("📱 Requesting a login code for {}...", credentials.phone_number);

    let token = client
        .request_login_code(&credentials.phone_number, &credentials.api_hash)
        .await
        .map_err(|e| Error::AuthenticationFailed(format!("Failed to request code: {}", e)))?;

    let code = read_terminal_line("Enter the code you received in Telegram: ")?;

    match client.sign_in(&token, &code).await {
        Ok(_) => Ok(()),
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none").to_string();
            let password = read_terminal_line(&format!("Two-step verification password (hint: {}): ", hint))?;
            client
                .check_password(password_token, password.as_bytes())
                .await
                .map(|_| ())
                .map_err(|e| Error::AuthenticationFailed(format!("Failed to check password: {}", e)))
        }
        Err(e) => Err(Error::AuthenticationFailed(format!("Failed to sign in: {}", e))),
    }
}

fn read_terminal_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Error::AuthenticationFailed("input closed during login".to_string()));
    }
    Ok(line.trim().to_string())
}

/// Connect and authorize in one step.
pub async fn get_client(credentials: &Credentials) -> Result<TelegramClient> {
    let client = TelegramClient::connect(credentials).await?;
    authorize(&client, credentials).await?;
    Ok(client)
}
