use crate::binding::{parse_message_link, validate_binding};
use crate::display::{DisplayClient, Fetched};
use crate::errors::{Result, Validation};
use crate::state::State;
use crate::structs::{Reply, ReplyType, Response};

use log::debug;

/// Takes over an existing message posted by the bot as the guild's display.
pub async fn bind(
    client: &impl DisplayClient,
    state: &State,
    guild_id: u64,
    bot_id: u64,
    url: &str,
) -> Result<Response> {
    let link = parse_message_link(url)?;
    // fail before touching the network if the link is from elsewhere
    link.ensure_guild(guild_id)?;

    let author = match client.fetch_message(link.target()).await {
        Ok(Fetched::Found(msg)) => msg.author,
        Ok(Fetched::NotFound) => return Err(Validation::MessageUnavailable.into()),
        Err(why) => {
            debug!("failed to fetch {link:?} for binding: {why}");
            return Err(Validation::MessageUnavailable.into());
        }
    };

    let target = validate_binding(&link, guild_id, author, bot_id)?;
    let record = state.update(guild_id, |record| {
        record.bind_message(target);
        Ok(record.clone())
    })?;

    Ok(Response::resync(
        Reply::new_const("Bound to that message.", ReplyType::Private),
        record,
    ))
}
