pub(crate) mod commands;

use crate::display::{self, SerenityClient};
use crate::state::State;

use commands::{handle_command, register_commands};
use log::{debug, info, warn};
use serenity::{
    async_trait,
    model::{application::interaction::Interaction, gateway::Ready, id::GuildId},
    prelude::*,
};

pub struct Handler {
    state: State,
}

impl Handler {
    pub const fn new(state: State) -> Handler {
        Handler { state }
    }

    /// Registers the command set in `guild` and redraws its display, if the
    /// guild already has a counter.
    async fn prepare_guild(&self, ctx: &Context, guild: GuildId) {
        match guild
            .set_application_commands(&ctx.http, register_commands)
            .await
        {
            Ok(_) => info!("synced commands to guild {guild}"),
            Err(why) => warn!("Failed to sync commands to guild {guild}: {why}"),
        }

        let record = match self.state.existing(*guild.as_u64()) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(why) => {
                warn!("Failed to read record for guild {guild}: {why}");
                return;
            }
        };
        let client = SerenityClient::new(&ctx.http);
        match display::sync(&client, &self.state, &record).await {
            Ok(outcome) => debug!("startup refresh of guild {guild}: {outcome:?}"),
            Err(why) => warn!("Failed to refresh display of guild {guild}: {why}"),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            handle_command(&ctx, &self.state, &command).await;
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected! (ID: {})", ready.user.name, ready.user.id);
        for guild in &ready.guilds {
            self.prepare_guild(&ctx, guild.id).await;
        }
    }
}
