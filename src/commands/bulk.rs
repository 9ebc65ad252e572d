//! Send the same message to every user listed in a file

use std::path::Path;

use crate::dispatch::{BulkSummary, Dispatcher, Messenger};
use crate::error::Result;
use crate::recipient::{read_handles_file, Handle};

/// Read and validate the recipient list before any connection is made.
pub fn load(file: &Path) -> Result<Vec<Handle>> {
    read_handles_file(file)
}

/// CLI entry point: dispatch to every handle and print the summary.
pub async fn run<M: Messenger>(
    dispatcher: &Dispatcher<'_, M>,
    handles: &[Handle],
    message: &str,
) -> Result<BulkSummary> {
    let pacing = dispatcher.pacing();
    println!(
        "Sending message to {} users ({}s between messages)...",
        handles.len(),
        pacing.delay.as_secs()
    );

    let outcomes = dispatcher.send_bulk(handles, message).await?;
    let summary = BulkSummary::from_outcomes(&outcomes);

    println!("\n{}", summary);
    Ok(summary)
}
