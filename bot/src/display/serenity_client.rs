use super::{DisplayClient, Fetched, FetchedMessage};
use crate::errors::{Error, Result};

use db::MessageTarget;
use reqwest::StatusCode;
use serde_json::json;
use serenity::async_trait;
use serenity::http::{Http, HttpError};
use serenity::model::id::ChannelId;

/// [`DisplayClient`] backed by the Discord REST API.
pub struct SerenityClient<'a> {
    http: &'a Http,
}

impl<'a> SerenityClient<'a> {
    pub const fn new(http: &'a Http) -> SerenityClient<'a> {
        SerenityClient { http }
    }
}

fn status(why: &serenity::Error) -> Option<StatusCode> {
    match why {
        serenity::Error::Http(inner) => match &**inner {
            HttpError::UnsuccessfulRequest(response) => Some(response.status_code),
            _ => None,
        },
        _ => None,
    }
}

fn classify(why: serenity::Error) -> Error {
    if status(&why) == Some(StatusCode::FORBIDDEN) {
        Error::Forbidden
    } else {
        Error::Serenity(why)
    }
}

#[async_trait]
impl<'a> DisplayClient for SerenityClient<'a> {
    async fn fetch_message(&self, target: MessageTarget) -> Result<Fetched<FetchedMessage>> {
        match self.http.get_message(target.channel, target.message).await {
            Ok(msg) => Ok(Fetched::Found(FetchedMessage {
                author: *msg.author.id.as_u64(),
                content: msg.content,
            })),
            Err(why) if status(&why) == Some(StatusCode::NOT_FOUND) => Ok(Fetched::NotFound),
            Err(why) => Err(classify(why)),
        }
    }

    async fn edit_message(&self, target: MessageTarget, content: &str) -> Result<()> {
        self.http
            .edit_message(target.channel, target.message, &json!({ "content": content }))
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn fetch_channel_name(&self, channel: u64) -> Result<Fetched<String>> {
        match self.http.get_channel(channel).await {
            Ok(found) => found
                .guild()
                .map(|guild_channel| Fetched::Found(guild_channel.name))
                .ok_or(Error::ConstStr("Rename target is not a guild channel")),
            Err(why) if status(&why) == Some(StatusCode::NOT_FOUND) => Ok(Fetched::NotFound),
            Err(why) => Err(classify(why)),
        }
    }

    async fn rename_channel(&self, channel: u64, name: &str) -> Result<()> {
        ChannelId(channel)
            .edit(self.http, |edit| edit.name(name))
            .await
            .map_err(classify)?;
        Ok(())
    }
}
