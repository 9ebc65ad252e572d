//! Command-level tests against an in-memory messenger

mod test_bulk;
mod test_init_session;
mod test_send_message;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use telegram_sender::{ClientError, Handle, Messenger};

/// Records every call; send results can be scripted per recipient.
#[derive(Default)]
pub struct FakeMessenger {
    unknown: HashSet<String>,
    scripted: RefCell<HashMap<String, VecDeque<Result<(), ClientError>>>>,
    pub resolved: RefCell<Vec<String>>,
    pub sent: RefCell<Vec<(String, String)>>,
}

impl FakeMessenger {
    pub fn with_unknown(mut self, name: &str) -> Self {
        self.unknown.insert(name.to_string());
        self
    }

    pub fn with_send_result(self, name: &str, result: Result<(), ClientError>) -> Self {
        self.scripted
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.borrow().clone()
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(to, _)| to.clone()).collect()
    }
}

#[async_trait(?Send)]
impl Messenger for FakeMessenger {
    type Peer = String;

    async fn resolve(&self, handle: &Handle) -> Result<String, ClientError> {
        let name = handle.as_str().to_string();
        self.resolved.borrow_mut().push(name.clone());
        if self.unknown.contains(&name) {
            return Err(ClientError::NotFound);
        }
        Ok(name)
    }

    async fn send(&self, peer: &String, text: &str) -> Result<(), ClientError> {
        self.sent
            .borrow_mut()
            .push((peer.clone(), text.to_string()));
        self.scripted
            .borrow_mut()
            .get_mut(peer)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(()))
    }
}
