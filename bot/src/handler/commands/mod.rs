mod admin;
mod bind;
pub mod counter;

use crate::display::{self, DisplayClient, SerenityClient};
use crate::errors::{Error, Result, Validation};
use crate::state::State;
use crate::structs::{Followup, Reply, ReplyType, Response};

use counter::{MAX_DAYS, MIN_DAYS};
use db::{DisplayMode, MessageTarget};
use log::{debug, warn};
use serenity::builder::CreateApplicationCommands;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandData, CommandDataOption, CommandDataOptionValue,
};
use serenity::model::channel::ChannelType;
use serenity::prelude::*;

/// Name of the slash command group holding every counter command.
pub const GROUP: &str = "counter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Sync,
    Post,
    Set { days: i64 },
    Inc,
    Reset,
    Show,
    Bind { url: String },
    Template { text: String },
    Mode { kind: DisplayMode, channel: Option<u64> },
}

/// A resolved option value, stripped of serenity's wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Str(String),
    Channel(u64),
}

impl Arg {
    fn from_option(option: &CommandDataOption) -> Option<Arg> {
        match option.resolved.as_ref()? {
            CommandDataOptionValue::Integer(i) => Some(Arg::Int(*i)),
            CommandDataOptionValue::String(s) => Some(Arg::Str(s.clone())),
            CommandDataOptionValue::Channel(channel) => Some(Arg::Channel(*channel.id.as_u64())),
            _ => None,
        }
    }
}

fn parse_mode(kind: &str) -> Option<DisplayMode> {
    match kind {
        "message" => Some(DisplayMode::Message),
        "channel_name" => Some(DisplayMode::ChannelName),
        _ => None,
    }
}

impl Command {
    pub fn parse(name: &str, sub: Option<&str>, args: &[(&str, Arg)]) -> Option<Command> {
        let arg = |key: &str| args.iter().find(|(k, _)| *k == key).map(|(_, v)| v);

        let command = match (name, sub) {
            ("ping", None) => Command::Ping,
            ("sync", None) => Command::Sync,
            (GROUP, Some("post")) => Command::Post,
            (GROUP, Some("set")) => match arg("days")? {
                Arg::Int(days) => Command::Set { days: *days },
                _ => return None,
            },
            (GROUP, Some("inc")) => Command::Inc,
            (GROUP, Some("reset")) => Command::Reset,
            (GROUP, Some("show")) => Command::Show,
            (GROUP, Some("bind")) => match arg("message_url")? {
                Arg::Str(url) => Command::Bind { url: url.clone() },
                _ => return None,
            },
            (GROUP, Some("template")) => match arg("text")? {
                Arg::Str(text) => Command::Template { text: text.clone() },
                _ => return None,
            },
            (GROUP, Some("mode")) => {
                let kind = match arg("kind")? {
                    Arg::Str(kind) => parse_mode(kind)?,
                    _ => return None,
                };
                let channel = match arg("channel") {
                    Some(Arg::Channel(channel)) => Some(*channel),
                    _ => None,
                };
                Command::Mode { kind, channel }
            }
            _ => return None,
        };
        Some(command)
    }

    pub fn from_data(data: &CommandData) -> Option<Command> {
        let (sub, options) = match data.options.first() {
            Some(option) if matches!(option.kind, CommandOptionType::SubCommand) => {
                (Some(option.name.as_str()), &option.options)
            }
            _ => (None, &data.options),
        };
        let args: Vec<(&str, Arg)> = options
            .iter()
            .filter_map(|option| Arg::from_option(option).map(|arg| (option.name.as_str(), arg)))
            .collect();

        Command::parse(&data.name, sub, &args)
    }
}

/// Builds the full command set. Registered per guild so changes show up
/// without waiting on global propagation.
pub fn register_commands(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    commands
        .create_application_command(|command| {
            command.name("ping").description("Check if the bot is alive")
        })
        .create_application_command(|command| {
            command
                .name("sync")
                .description("Force-sync slash commands in this server (owner-only)")
        })
        .create_application_command(|command| {
            command
                .name(GROUP)
                .description("Days-since counter controls")
                .create_option(|option| {
                    option
                        .name("post")
                        .description("Post a new counter message here and bind to it")
                        .kind(CommandOptionType::SubCommand)
                })
                .create_option(|option| {
                    option
                        .name("set")
                        .description("Set the counter to an exact number of days")
                        .kind(CommandOptionType::SubCommand)
                        .create_sub_option(|days| {
                            days.name("days")
                                .description("Number of days")
                                .kind(CommandOptionType::Integer)
                                .min_int_value(MIN_DAYS)
                                .max_int_value(MAX_DAYS)
                                .required(true)
                        })
                })
                .create_option(|option| {
                    option
                        .name("inc")
                        .description("Increment by 1 day")
                        .kind(CommandOptionType::SubCommand)
                })
                .create_option(|option| {
                    option
                        .name("reset")
                        .description("Reset to 0")
                        .kind(CommandOptionType::SubCommand)
                })
                .create_option(|option| {
                    option
                        .name("show")
                        .description("Show the current counter")
                        .kind(CommandOptionType::SubCommand)
                })
                .create_option(|option| {
                    option
                        .name("bind")
                        .description("Bind to an existing message posted by this bot")
                        .kind(CommandOptionType::SubCommand)
                        .create_sub_option(|url| {
                            url.name("message_url")
                                .description("Right-click the message, then Copy Message Link")
                                .kind(CommandOptionType::String)
                                .required(true)
                        })
                })
                .create_option(|option| {
                    option
                        .name("template")
                        .description("Set the text template (use {days} once)")
                        .kind(CommandOptionType::SubCommand)
                        .create_sub_option(|text| {
                            text.name("text")
                                .description("Example: '{days} days since the last incident'")
                                .kind(CommandOptionType::String)
                                .required(true)
                        })
                })
                .create_option(|option| {
                    option
                        .name("mode")
                        .description("Switch display mode: message or channel_name")
                        .kind(CommandOptionType::SubCommand)
                        .create_sub_option(|kind| {
                            kind.name("kind")
                                .description("Where to show the counter")
                                .kind(CommandOptionType::String)
                                .add_string_choice("message", "message")
                                .add_string_choice("channel_name", "channel_name")
                                .required(true)
                        })
                        .create_sub_option(|channel| {
                            channel
                                .name("channel")
                                .description("If channel_name mode: which channel to rename")
                                .kind(CommandOptionType::Channel)
                                .channel_types(&[ChannelType::Text, ChannelType::Voice])
                        })
                })
        })
}

async fn respond(
    ctx: &Context,
    state: &State,
    client: &impl DisplayClient,
    command: &ApplicationCommandInteraction,
) -> Result<Response> {
    let parsed = Command::from_data(&command.data).ok_or(Validation::UnknownCommand)?;
    debug!("handling {parsed:?} from user {}", command.user.id);

    let guild = || -> Result<u64> {
        Ok(*command.guild_id.ok_or(Validation::NotInGuild)?.as_u64())
    };

    match parsed {
        Command::Ping => Ok(admin::ping()),
        Command::Sync => admin::sync_commands(ctx, guild()?, *command.user.id.as_u64()).await,
        Command::Post => counter::post(state, guild()?),
        Command::Set { days } => counter::set(state, guild()?, days),
        Command::Inc => counter::increment(state, guild()?),
        Command::Reset => counter::reset(state, guild()?),
        Command::Show => counter::show(state, guild()?),
        Command::Template { text } => counter::template(state, guild()?, &text),
        Command::Mode { kind, channel } => counter::mode(state, guild()?, kind, channel),
        Command::Bind { url } => {
            let bot_id = *ctx.cache.current_user_id().as_u64();
            bind::bind(client, state, guild()?, bot_id, &url).await
        }
    }
}

async fn followup(
    ctx: &Context,
    state: &State,
    client: &impl DisplayClient,
    command: &ApplicationCommandInteraction,
    followup: Followup,
) -> Result<()> {
    let record = match followup {
        Followup::Nothing => return Ok(()),
        Followup::Resync(record) => record,
        Followup::BindReply(guild_id) => {
            let posted = command.get_interaction_response(&ctx.http).await?;
            let target = MessageTarget {
                channel: *posted.channel_id.as_u64(),
                message: *posted.id.as_u64(),
            };
            counter::bind_posted(state, guild_id, target)?
        }
    };

    let outcome = display::sync(client, state, &record).await?;
    debug!("display for guild {}: {outcome:?}", record.guild_id());
    Ok(())
}

/// Answers a slash command, then brings the guild's display up to date.
/// Validation failures go back to the user privately; anything else is
/// logged.
pub async fn handle_command(ctx: &Context, state: &State, command: &ApplicationCommandInteraction) {
    let client = SerenityClient::new(&ctx.http);

    let response = match respond(ctx, state, &client, command).await {
        Ok(response) => response,
        Err(Error::Validation(why)) => {
            Response::reply(Reply::new(why.to_string(), ReplyType::Private))
        }
        Err(why) => {
            warn!("Failed to process command {} with err: {why}", command.data.name);
            Response::reply(Reply::new_const(
                "Something went wrong, try again later.",
                ReplyType::Private,
            ))
        }
    };

    if let Err(why) = response.reply.send(ctx, command).await {
        warn!("Failed to reply to command {} with err: {why}", command.data.name);
        return;
    }

    if let Err(why) = followup(ctx, state, &client, command, response.followup).await {
        warn!("Display update after {} failed: {why}", command.data.name);
    }
}
