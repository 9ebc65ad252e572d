//! Interactive mode: read recipient and message pairs from the terminal

use std::io;

use crate::dispatch::{Dispatcher, Messenger};
use crate::error::Result;

pub async fn run<M: Messenger>(dispatcher: &Dispatcher<'_, M>) -> Result<()> {
    println!("\n=== Telegram Message Sender - Interactive Mode ===");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    dispatcher.send_interactive(&mut input, &mut output).await
}
