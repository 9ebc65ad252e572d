//! Recipient handles
//!
//! A handle is what the user types (`@alice`, `alice`); internally it is
//! always stored without the leading `@`.

use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Shape of a Telegram username: latin letters, digits and underscores, starting
/// with a letter. Length is 4-32 so collectible short names pass; Telegram has
/// the final say.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{3,31}$").expect("valid username regex"));

/// Normalized recipient handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    /// Normalize user input: trims whitespace and strips leading `@`s.
    pub fn new(input: &str) -> Self {
        Handle(input.trim().trim_start_matches('@').trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the handle could be a Telegram username at all.
    pub fn is_valid_username(&self) -> bool {
        USERNAME_RE.is_match(&self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Handle::new(value)
    }
}

/// Parse a newline-delimited handle list. Blank lines are skipped.
pub fn parse_handles(content: &str) -> Vec<Handle> {
    content
        .lines()
        .map(Handle::new)
        .filter(|h| !h.is_empty())
        .collect()
}

/// Read a handle list file; an empty list is an error.
pub fn read_handles_file<P: AsRef<Path>>(path: P) -> Result<Vec<Handle>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::InvalidArgument(format!("Cannot read file '{}': {}", path.display(), e))
    })?;

    let handles = parse_handles(&content);
    if handles.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "No usernames found in '{}'",
            path.display()
        )));
    }
    Ok(handles)
}
