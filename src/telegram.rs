//! [`Messenger`] implementation over the grammers client
//!
//! Translates grammers invocation errors into [`ClientError`] right at the call site.

use std::time::Duration;

use async_trait::async_trait;
use grammers_client::types::peer::Peer;
use grammers_client::{Client, InvocationError};
use tracing::{debug, warn};

use crate::dispatch::{ClientError, Messenger};
use crate::recipient::Handle;

/// RPC errors meaning the session itself is no longer valid.
const AUTH_ERRORS: &[&str] = &[
    "AUTH_KEY_UNREGISTERED",
    "AUTH_KEY_INVALID",
    "AUTH_KEY_DUPLICATED",
    "SESSION_REVOKED",
    "SESSION_EXPIRED",
    "USER_DEACTIVATED",
    "USER_DEACTIVATED_BAN",
];

/// Classify an RPC error by code and name (grammers strips the numeric
/// suffix of `FLOOD_WAIT_X` into `value`).
pub fn classify_rpc(code: i32, name: &str, value: Option<u32>) -> ClientError {
    match name {
        "FLOOD_WAIT" | "FLOOD_PREMIUM_WAIT" | "SLOWMODE_WAIT" => {
            ClientError::RateLimited(Duration::from_secs(u64::from(value.unwrap_or(0))))
        }
        "USERNAME_NOT_OCCUPIED" | "USERNAME_INVALID" | "PEER_ID_INVALID" => ClientError::NotFound,
        "PEER_FLOOD" => {
            ClientError::Unknown("too many requests (PEER_FLOOD), try again later".to_string())
        }
        _ if code == 401 || AUTH_ERRORS.contains(&name) => ClientError::AuthFailed(name.to_string()),
        _ => ClientError::Unknown(format!("{} ({})", name, code)),
    }
}

fn classify(err: InvocationError) -> ClientError {
    match err {
        InvocationError::Rpc(rpc) => classify_rpc(rpc.code, &rpc.name, rpc.value),
        other => ClientError::Network(other.to_string()),
    }
}

#[async_trait(?Send)]
impl Messenger for Client {
    type Peer = Peer;

    async fn resolve(&self, handle: &Handle) -> Result<Peer, ClientError> {
        if !handle.is_valid_username() {
            warn!(%handle, "Username is invalid");
            return Err(ClientError::NotFound);
        }

        match self.resolve_username(handle.as_str()).await.map_err(classify)? {
            Some(peer @ Peer::User(_)) => {
                debug!(%handle, "Resolved");
                Ok(peer)
            }
            Some(_) => {
                warn!(%handle, "Not a user (might be a channel or group)");
                Err(ClientError::NotFound)
            }
            None => Err(ClientError::NotFound),
        }
    }

    async fn send(&self, peer: &Peer, text: &str) -> Result<(), ClientError> {
        self.send_message(peer, text).await.map(|_| ()).map_err(classify)
    }
}
