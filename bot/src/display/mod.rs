//! Pushes a record's rendering to wherever the guild has bound it.
//!
//! All platform traffic for displays goes through [`DisplayClient`] so the
//! rules here can run against something other than Discord.

#[cfg(test)]
pub(crate) mod mock;
pub mod render;
mod serenity_client;

pub use render::{render, sanitize_channel_name};
pub use serenity_client::SerenityClient;

use crate::errors::Result;
use crate::state::State;

use db::{CounterRecord, DisplayBinding, MessageTarget};
use log::{debug, info, warn};
use serenity::async_trait;

/// Result of a lookup where a missing object is an expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    pub author: u64,
    pub content: String,
}

#[async_trait]
pub trait DisplayClient: Sync {
    async fn fetch_message(&self, target: MessageTarget) -> Result<Fetched<FetchedMessage>>;

    async fn edit_message(&self, target: MessageTarget, content: &str) -> Result<()>;

    async fn fetch_channel_name(&self, channel: u64) -> Result<Fetched<String>>;

    async fn rename_channel(&self, channel: u64, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing is bound, so there is nothing to show.
    Unbound,
    /// The target already shows the current text.
    Unchanged,
    Updated,
    /// The bound message is gone and the binding was cleared.
    Recovered,
    /// The platform refused or failed; the display is stale until next time.
    Skipped,
}

/// Shows `record` on its bound target. Only the binding can change here, and
/// only when the bound message turns out to be deleted.
///
/// Failures in message mode are logged and reported as
/// [`SyncOutcome::Skipped`]. In channel name mode a permission denial is
/// skipped the same way but any other error is returned.
pub async fn sync(
    client: &impl DisplayClient,
    state: &State,
    record: &CounterRecord,
) -> Result<SyncOutcome> {
    match record.binding() {
        DisplayBinding::Message(Some(target)) => {
            Ok(sync_message(client, state, record, target).await)
        }
        DisplayBinding::ChannelName(Some(channel)) => {
            sync_channel_name(client, record, channel).await
        }
        DisplayBinding::Message(None) | DisplayBinding::ChannelName(None) => {
            debug!("guild {} has no display bound", record.guild_id());
            Ok(SyncOutcome::Unbound)
        }
    }
}

async fn sync_message(
    client: &impl DisplayClient,
    state: &State,
    record: &CounterRecord,
    target: MessageTarget,
) -> SyncOutcome {
    let guild_id = record.guild_id();
    let current = match client.fetch_message(target).await {
        Ok(Fetched::Found(msg)) => msg,
        Ok(Fetched::NotFound) => return recover(state, guild_id, target),
        Err(why) => {
            warn!("guild {guild_id}: failed to fetch bound message {target:?}: {why}");
            return SyncOutcome::Skipped;
        }
    };

    let text = render(record);
    if current.content == text {
        return SyncOutcome::Unchanged;
    }

    match client.edit_message(target, &text).await {
        Ok(()) => {
            debug!("guild {guild_id}: edited message {}", target.message);
            SyncOutcome::Updated
        }
        Err(why) => {
            warn!("guild {guild_id}: failed to edit bound message {target:?}: {why}");
            SyncOutcome::Skipped
        }
    }
}

fn recover(state: &State, guild_id: u64, target: MessageTarget) -> SyncOutcome {
    info!("guild {guild_id}: bound message {target:?} is gone, unbinding");
    match state.update_if_changed(guild_id, |record| record.clear_message_target(target)) {
        Ok(true) => SyncOutcome::Recovered,
        Ok(false) => {
            debug!("guild {guild_id}: binding already moved on from {target:?}");
            SyncOutcome::Skipped
        }
        Err(why) => {
            warn!("guild {guild_id}: failed to persist cleared binding: {why}");
            SyncOutcome::Skipped
        }
    }
}

async fn sync_channel_name(
    client: &impl DisplayClient,
    record: &CounterRecord,
    channel: u64,
) -> Result<SyncOutcome> {
    let guild_id = record.guild_id();
    let name = sanitize_channel_name(&render(record));

    // a deleted rename target is left bound, there is no recovery for it
    match client.fetch_channel_name(channel).await {
        Ok(Fetched::Found(current)) if current == name => return Ok(SyncOutcome::Unchanged),
        Ok(Fetched::Found(_)) => (),
        Ok(Fetched::NotFound) => {
            warn!("guild {guild_id}: rename target channel {channel} not found");
            return Ok(SyncOutcome::Skipped);
        }
        Err(why) if why.is_forbidden() => {
            info!("guild {guild_id}: not allowed to view channel {channel}");
            return Ok(SyncOutcome::Skipped);
        }
        Err(why) => return Err(why),
    }

    match client.rename_channel(channel, &name).await {
        Ok(()) => {
            debug!("guild {guild_id}: renamed channel {channel} to {name}");
            Ok(SyncOutcome::Updated)
        }
        Err(why) if why.is_forbidden() => {
            info!("guild {guild_id}: not allowed to rename channel {channel}");
            Ok(SyncOutcome::Skipped)
        }
        Err(why) => Err(why),
    }
}
