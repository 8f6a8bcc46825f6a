use crate::errors::Result;

use db::CounterRecord;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

#[derive(Debug)]
pub enum ReplyContents {
    String(String),
    ConstStr(&'static str),
}

/// Who gets to see a reply. Private replies are ephemeral and only shown
/// to the person who ran the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyType {
    Public,
    Private,
}

#[derive(Debug)]
pub struct Reply {
    message: ReplyContents,
    place: ReplyType,
}

impl Reply {
    pub const fn new(message: String, place: ReplyType) -> Reply {
        Reply {
            message: ReplyContents::String(message),
            place,
        }
    }

    pub const fn new_const(message: &'static str, place: ReplyType) -> Reply {
        Reply {
            message: ReplyContents::ConstStr(message),
            place,
        }
    }

    pub fn content(&self) -> &str {
        match &self.message {
            ReplyContents::String(inner) => inner,
            ReplyContents::ConstStr(inner) => inner,
        }
    }

    #[inline(always)]
    pub const fn place(&self) -> ReplyType {
        self.place
    }

    pub async fn send(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let content = self.content();
        let ephemeral = self.place == ReplyType::Private;
        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(content)
                            .ephemeral(ephemeral)
                            .allowed_mentions(|mentions| mentions.empty_parse())
                    })
            })
            .await?;
        Ok(())
    }
}

/// What happens once the reply has gone out.
#[derive(Debug, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    /// Push this record to its bound display.
    Resync(CounterRecord),
    /// Bind the guild's record to the reply that was just sent.
    BindReply(u64),
}

#[derive(Debug)]
pub struct Response {
    pub reply: Reply,
    pub followup: Followup,
}

impl Response {
    pub const fn reply(reply: Reply) -> Response {
        Response {
            reply,
            followup: Followup::Nothing,
        }
    }

    pub const fn resync(reply: Reply, record: CounterRecord) -> Response {
        Response {
            reply,
            followup: Followup::Resync(record),
        }
    }
}
