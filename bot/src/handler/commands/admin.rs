use super::register_commands;
use crate::errors::{Result, Validation};
use crate::structs::{Reply, ReplyType, Response};

use log::info;
use serenity::model::id::GuildId;
use serenity::prelude::*;

pub const fn ping() -> Response {
    Response::reply(Reply::new_const("pong", ReplyType::Private))
}

pub const fn ensure_owner(user: u64, owner: u64) -> std::result::Result<(), Validation> {
    if user == owner {
        Ok(())
    } else {
        Err(Validation::NotOwner)
    }
}

/// Re-registers the command set in `guild_id`. Only the application owner
/// may do this.
pub async fn sync_commands(ctx: &Context, guild_id: u64, user: u64) -> Result<Response> {
    let owner = ctx.http.get_current_application_info().await?.owner.id;
    ensure_owner(user, *owner.as_u64())?;

    GuildId(guild_id)
        .set_application_commands(&ctx.http, register_commands)
        .await?;
    info!("re-registered commands in guild {guild_id}");

    Ok(Response::reply(Reply::new_const(
        "Commands synced to this server.",
        ReplyType::Private,
    )))
}
