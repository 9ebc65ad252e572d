//! Telegram Sender CLI - main entry point
//!
//! Sends messages from a personal Telegram account in one of three modes:
//! single recipient, interactive loop, or bulk from a list file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing::{error, warn};

use telegram_sender::commands::{self, Mode};
use telegram_sender::config::{self, ConfigFile, Credentials, SenderSettings, SESSION_NAME};
use telegram_sender::dispatch::{Dispatcher, Pacing};
use telegram_sender::session::{get_client, SessionLock};
use telegram_sender::{logging, Error};

#[derive(Parser)]
#[command(name = "telegram_sender")]
#[command(about = "Send Telegram messages using your personal account", long_about = None)]
#[command(version)]
struct Cli {
    /// Username to send the message to (with or without @)
    handle: Option<String>,

    /// Message to send
    message: Option<String>,

    /// Run in interactive mode
    #[arg(short, long, conflicts_with = "bulk")]
    interactive: bool,

    /// File containing usernames (one per line); the message is the only positional argument
    #[arg(short, long, value_name = "FILE")]
    bulk: Option<PathBuf>,

    /// Delay between bulk messages (seconds)
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<u64>,

    /// How many times a rate-limited recipient is retried in bulk mode
    #[arg(long)]
    retries: Option<u32>,

    /// Log file (appended to)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Path to the YAML config file
    #[arg(long, env = config::ENV_CONFIG_FILE, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

impl Cli {
    /// Config file settings with command-line overrides applied.
    fn sender_settings(&self, file: &ConfigFile) -> SenderSettings {
        let mut settings = file.sender_settings();
        if let Some(delay) = self.delay {
            settings.delay = Duration::from_secs(delay);
        }
        if let Some(retries) = self.retries {
            settings.flood_retries = retries;
        }
        if let Some(path) = &self.log_file {
            settings.log_file = Some(path.clone());
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env for local development
    config::load_dotenv();

    let cli = Cli::parse();
    let file = ConfigFile::load(&cli.config)?;
    let settings = cli.sender_settings(&file);

    logging::init(settings.log_file.as_deref())?;

    let mode = match Mode::resolve(
        cli.interactive,
        cli.bulk.clone(),
        cli.handle.clone(),
        cli.message.clone(),
    ) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}\n", err);
            Cli::command().print_help()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let credentials = match Credentials::resolve(file.telegram(), config::env_lookup) {
        Ok(credentials) => credentials,
        Err(err) => return Err(fatal(err, &format!("{}.session", SESSION_NAME))),
    };

    match execute(mode, &credentials, &settings).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(err) => Err(fatal(err, &credentials.session_file())),
    }
}

/// Connect, run the selected mode, disconnect. `Ok(false)` means some message was not sent.
async fn execute(
    mode: Mode,
    credentials: &Credentials,
    settings: &SenderSettings,
) -> telegram_sender::Result<bool> {
    // Read the list before touching the session
    let bulk_handles = match &mode {
        Mode::Bulk { file, .. } => Some(commands::bulk::load(file)?),
        _ => None,
    };

    let _lock = SessionLock::acquire(credentials.lock_file())?;
    let client = get_client(credentials).await?;
    let dispatcher = Dispatcher::new(&client.client, Pacing::from(settings));

    let result = match mode {
        Mode::Single { handle, message } => {
            commands::send_message::run(&dispatcher, &handle, &message)
                .await
                .map(|result| result.is_sent())
        }
        Mode::Interactive => commands::interactive::run(&dispatcher).await.map(|()| true),
        Mode::Bulk { message, .. } => {
            let handles = bulk_handles.unwrap_or_default();
            commands::bulk::run(&dispatcher, &handles, &message)
                .await
                .map(|summary| summary.all_sent())
        }
    };

    client.disconnect();
    result
}

fn fatal(err: Error, session_file: &str) -> anyhow::Error {
    if err.is_fatal() {
        error!("Fatal: {}", err);
    } else {
        warn!("{}", err);
    }
    if let Some(hint) = err.remediation(session_file) {
        eprintln!("\n💡 {}", hint);
    }
    err.into()
}
