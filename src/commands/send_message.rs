//! Send one message to one user

use crate::dispatch::{DispatchResult, Dispatcher, Messenger};
use crate::error::Result;
use crate::recipient::Handle;

/// CLI entry point; prints progress and the outcome.
pub async fn run<M: Messenger>(
    dispatcher: &Dispatcher<'_, M>,
    handle: &str,
    message: &str,
) -> Result<DispatchResult> {
    let handle = Handle::new(handle);
    println!("Sending message to {}...", handle);

    let result = dispatcher.send_one(&handle, message).await?;
    println!("{}", result.status_line());
    Ok(result)
}
