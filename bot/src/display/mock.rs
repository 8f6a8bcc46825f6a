use super::{DisplayClient, Fetched, FetchedMessage};
use crate::errors::{Error, Result};

use db::MessageTarget;
use serenity::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    None,
    Forbidden,
    Broken,
}

impl Default for Refusal {
    fn default() -> Self {
        Refusal::None
    }
}

/// In-memory stand in for Discord. Edits and renames change what later
/// fetches return.
#[derive(Debug, Default)]
pub struct MockClient {
    messages: Mutex<HashMap<MessageTarget, FetchedMessage>>,
    channels: Mutex<HashMap<u64, String>>,
    refusal: Refusal,
    fetch_refusal: Refusal,
    edits: Mutex<usize>,
    renames: Mutex<usize>,
}

impl MockClient {
    pub fn with_message(self, target: MessageTarget, author: u64, content: &str) -> Self {
        self.messages.lock().unwrap().insert(
            target,
            FetchedMessage {
                author,
                content: content.to_string(),
            },
        );
        self
    }

    pub fn with_channel(self, channel: u64, name: &str) -> Self {
        self.channels
            .lock()
            .unwrap()
            .insert(channel, name.to_string());
        self
    }

    pub fn refusing(mut self, refusal: Refusal) -> Self {
        self.refusal = refusal;
        self
    }

    /// Makes fetches fail. Edits and renames follow [`MockClient::refusing`].
    pub fn refusing_fetch(mut self, refusal: Refusal) -> Self {
        self.fetch_refusal = refusal;
        self
    }

    pub fn message_content(&self, target: MessageTarget) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .get(&target)
            .map(|msg| msg.content.clone())
    }

    pub fn channel_name(&self, channel: u64) -> Option<String> {
        self.channels.lock().unwrap().get(&channel).cloned()
    }

    pub fn edits(&self) -> usize {
        *self.edits.lock().unwrap()
    }

    pub fn renames(&self) -> usize {
        *self.renames.lock().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.edits() + self.renames()
    }

    fn check_refusal(&self) -> Result<()> {
        Self::refuse(self.refusal)
    }

    fn check_fetch_refusal(&self) -> Result<()> {
        Self::refuse(self.fetch_refusal)
    }

    fn refuse(refusal: Refusal) -> Result<()> {
        match refusal {
            Refusal::None => Ok(()),
            Refusal::Forbidden => Err(Error::Forbidden),
            Refusal::Broken => Err(Error::ConstStr("Internal Server Error")),
        }
    }
}

#[async_trait]
impl DisplayClient for MockClient {
    async fn fetch_message(&self, target: MessageTarget) -> Result<Fetched<FetchedMessage>> {
        self.check_fetch_refusal()?;
        Ok(match self.messages.lock().unwrap().get(&target) {
            Some(msg) => Fetched::Found(msg.clone()),
            None => Fetched::NotFound,
        })
    }

    async fn edit_message(&self, target: MessageTarget, content: &str) -> Result<()> {
        self.check_refusal()?;
        let mut messages = self.messages.lock().unwrap();
        let msg = messages
            .get_mut(&target)
            .ok_or(Error::ConstStr("Unknown Message"))?;
        msg.content = content.to_string();
        *self.edits.lock().unwrap() += 1;
        Ok(())
    }

    async fn fetch_channel_name(&self, channel: u64) -> Result<Fetched<String>> {
        self.check_fetch_refusal()?;
        Ok(match self.channels.lock().unwrap().get(&channel) {
            Some(name) => Fetched::Found(name.clone()),
            None => Fetched::NotFound,
        })
    }

    async fn rename_channel(&self, channel: u64, name: &str) -> Result<()> {
        self.check_refusal()?;
        let mut channels = self.channels.lock().unwrap();
        let current = channels
            .get_mut(&channel)
            .ok_or(Error::ConstStr("Unknown Channel"))?;
        *current = name.to_string();
        *self.renames.lock().unwrap() += 1;
        Ok(())
    }
}
