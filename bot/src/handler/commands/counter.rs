use crate::display::render;
use crate::errors::{Result, Validation};
use crate::state::State;
use crate::structs::{Followup, Reply, ReplyType, Response};

use db::{CounterRecord, DisplayMode, MessageTarget};

pub const MIN_DAYS: u64 = 0;
pub const MAX_DAYS: u64 = 10_000;

pub fn validate_days(days: i64) -> Result<u64> {
    match u64::try_from(days) {
        Ok(days) if days <= MAX_DAYS => Ok(days),
        _ => Err(Validation::DaysOutOfRange.into()),
    }
}

/// Replies publicly with the current text; the reply becomes the display.
pub fn post(state: &State, guild_id: u64) -> Result<Response> {
    let record = state.record(guild_id)?;
    Ok(Response {
        reply: Reply::new(render(&record), ReplyType::Public),
        followup: Followup::BindReply(guild_id),
    })
}

/// Binds the guild to the message that [`post`] produced.
pub fn bind_posted(state: &State, guild_id: u64, target: MessageTarget) -> Result<CounterRecord> {
    state.update(guild_id, |record| {
        record.bind_message(target);
        Ok(record.clone())
    })
}

pub fn set(state: &State, guild_id: u64, days: i64) -> Result<Response> {
    let days = validate_days(days)?;
    let record = state.update(guild_id, |record| {
        record.days = days;
        Ok(record.clone())
    })?;
    Ok(Response::resync(
        Reply::new(format!("Set to **{}**.", record.days), ReplyType::Private),
        record,
    ))
}

pub fn increment(state: &State, guild_id: u64) -> Result<Response> {
    let record = state.update(guild_id, |record| {
        record.increment();
        Ok(record.clone())
    })?;
    Ok(Response::resync(
        Reply::new(format!("Now **{}**.", record.days), ReplyType::Private),
        record,
    ))
}

pub fn reset(state: &State, guild_id: u64) -> Result<Response> {
    let record = state.update(guild_id, |record| {
        record.days = 0;
        Ok(record.clone())
    })?;
    Ok(Response::resync(
        Reply::new_const("Reset to **0**.", ReplyType::Private),
        record,
    ))
}

pub fn show(state: &State, guild_id: u64) -> Result<Response> {
    let record = state.record(guild_id)?;
    Ok(Response::reply(Reply::new(
        render(&record),
        ReplyType::Public,
    )))
}

pub fn template(state: &State, guild_id: u64, text: &str) -> Result<Response> {
    let record = state.update(guild_id, |record| {
        record.set_template(text)?;
        Ok(record.clone())
    })?;
    Ok(Response::resync(
        Reply::new_const("Template updated.", ReplyType::Private),
        record,
    ))
}

pub fn mode(
    state: &State,
    guild_id: u64,
    kind: DisplayMode,
    channel: Option<u64>,
) -> Result<Response> {
    let record = match (kind, channel) {
        (DisplayMode::ChannelName, None) => return Err(Validation::MissingChannel.into()),
        (DisplayMode::ChannelName, Some(channel)) => state.update(guild_id, |record| {
            record.bind_rename_channel(channel);
            Ok(record.clone())
        })?,
        (DisplayMode::Message, _) => state.update(guild_id, |record| {
            record.use_message_mode();
            Ok(record.clone())
        })?,
    };
    Ok(Response::resync(
        Reply::new(format!("Mode set to **{kind}**."), ReplyType::Private),
        record,
    ))
}
