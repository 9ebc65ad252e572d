//! Command implementations
//!
//! One module per CLI mode, plus session initialization.

pub mod bulk;
pub mod init_session;
pub mod interactive;
pub mod send_message;

use std::path::PathBuf;

use crate::error::{Error, Result};

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Single { handle: String, message: String },
    Interactive,
    Bulk { file: PathBuf, message: String },
}

impl Mode {
    /// Pick the mode from the parsed arguments.
    ///
    /// In bulk mode the message is the only positional argument.
    pub fn resolve(
        interactive: bool,
        bulk: Option<PathBuf>,
        handle: Option<String>,
        message: Option<String>,
    ) -> Result<Self> {
        if interactive {
            return Ok(Mode::Interactive);
        }

        if let Some(file) = bulk {
            let message = match (handle, message) {
                (Some(message), None) | (None, Some(message)) => message,
                (None, None) => {
                    return Err(Error::InvalidArgument(
                        "Message is required for bulk messaging".to_string(),
                    ))
                }
                (Some(_), Some(_)) => {
                    return Err(Error::InvalidArgument(
                        "Bulk mode takes only the message; recipients come from the file"
                            .to_string(),
                    ))
                }
            };
            return Ok(Mode::Bulk {
                file,
                message: non_empty(message)?,
            });
        }

        match (handle, message) {
            (Some(handle), Some(message)) => Ok(Mode::Single {
                handle,
                message: non_empty(message)?,
            }),
            _ => Err(Error::InvalidArgument(
                "Expected <handle> <message>, --interactive or --bulk <file> <message>".to_string(),
            )),
        }
    }
}

fn non_empty(message: String) -> Result<String> {
    if message.trim().is_empty() {
        return Err(Error::InvalidArgument("Message must not be empty".to_string()));
    }
    Ok(message)
}
