//! Session initialization command
//!
//! Logs the account in once and leaves `<SESSION_NAME>.session` behind for later runs.

use std::io::{self, BufRead, Write};

use crate::config::Credentials;
use crate::error::Result;
use crate::session::{authorize, SessionLock, TelegramClient};

/// Whether the user typed the confirmation word.
pub fn is_confirmed(input: &str) -> bool {
    input.trim() == "YES"
}

pub async fn run(credentials: &Credentials) -> Result<()> {
    let _lock = SessionLock::acquire(credentials.lock_file())?;
    let client = TelegramClient::connect(credentials).await?;

    if client.is_authorized().await? {
        println!(
            "✓ Session '{}' is already authorized, nothing to do.",
            credentials.session_file()
        );
        client.disconnect();
        return Ok(());
    }

    print!(
        r#"
╔═══════════════════════════════════════════════════════════════╗
║  NEW TELEGRAM SESSION                                         ║
╚═══════════════════════════════════════════════════════════════╝

A login code will be sent to {} and the session will be stored in
'{}'. Keep that file private: it grants full access to the account.

Type 'YES' (uppercase) to continue: "#,
        credentials.phone_number,
        credentials.session_file()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    if !is_confirmed(&input) {
        println!("\n❌ Cancelled. No session was created.");
        client.disconnect();
        return Ok(());
    }

    let result = authorize(&client, credentials).await;
    client.disconnect();
    result?;

    println!(
        r#"
╔═══════════════════════════════════════════════════════════════╗
║  ✅ SESSION CREATED                                           ║
╚═══════════════════════════════════════════════════════════════╝

Session file: {}

telegram_sender will reuse it automatically. Back it up and never share it.
"#,
        credentials.session_file()
    );

    Ok(())
}
