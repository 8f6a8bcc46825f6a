//! Checks that a pasted message link points at a message the bot may take
//! over as its display.

use crate::errors::Validation;

use db::MessageTarget;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLink {
    pub guild: u64,
    pub channel: u64,
    pub message: u64,
}

impl MessageLink {
    #[inline(always)]
    pub const fn target(&self) -> MessageTarget {
        MessageTarget {
            channel: self.channel,
            message: self.message,
        }
    }

    pub const fn ensure_guild(&self, current_guild: u64) -> Result<(), Validation> {
        if self.guild == current_guild {
            Ok(())
        } else {
            Err(Validation::WrongGuild)
        }
    }
}

fn discord_host(host: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^(?:(?:canary|ptb)\.)?discord(?:app)?\.com$").unwrap();
    }
    RE.is_match(host)
}

fn snowflake(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Parses `https://discord.com/channels/{guild}/{channel}/{message}`, as
/// produced by "Copy Message Link".
pub fn parse_message_link(input: &str) -> Result<MessageLink, Validation> {
    let url = Url::parse(input.trim()).map_err(|_| Validation::InvalidLink)?;
    if url.scheme() != "https" || !url.host_str().map_or(false, discord_host) {
        return Err(Validation::InvalidLink);
    }

    let mut segments: Vec<&str> = url
        .path_segments()
        .ok_or(Validation::InvalidLink)?
        .collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }

    match segments.as_slice() {
        ["channels", guild, channel, message] => Ok(MessageLink {
            guild: snowflake(guild).ok_or(Validation::InvalidLink)?,
            channel: snowflake(channel).ok_or(Validation::InvalidLink)?,
            message: snowflake(message).ok_or(Validation::InvalidLink)?,
        }),
        _ => Err(Validation::InvalidLink),
    }
}

/// Accepts `link` as the guild's display if it lives in `current_guild` and
/// was written by the bot, since only its own messages can be edited.
pub fn validate_binding(
    link: &MessageLink,
    current_guild: u64,
    author: u64,
    bot: u64,
) -> Result<MessageTarget, Validation> {
    link.ensure_guild(current_guild)?;
    if author != bot {
        return Err(Validation::NotOwned);
    }
    Ok(link.target())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: MessageLink = MessageLink {
        guild: 111,
        channel: 222,
        message: 333,
    };

    #[test]
    fn test_parse_link() {
        assert_eq!(
            parse_message_link("https://discord.com/channels/111/222/333"),
            Ok(LINK)
        );
    }

    #[test]
    fn test_parse_alternate_hosts() {
        for host in [
            "discordapp.com",
            "ptb.discord.com",
            "canary.discord.com",
            "canary.discordapp.com",
        ] {
            assert_eq!(
                parse_message_link(&format!("https://{host}/channels/111/222/333")),
                Ok(LINK),
                "{host}"
            );
        }
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_slash() {
        assert_eq!(
            parse_message_link("  https://discord.com/channels/111/222/333/ "),
            Ok(LINK)
        );
    }

    #[test]
    fn test_parse_real_snowflakes() {
        let link = parse_message_link(
            "https://discord.com/channels/923456789012345678/823456789012345678/723456789012345678",
        )
        .unwrap();
        assert_eq!(link.guild, 923456789012345678);
        assert_eq!(link.channel, 823456789012345678);
        assert_eq!(link.message, 723456789012345678);
    }

    #[test]
    fn test_parse_rejects() {
        for input in [
            "",
            "not a url",
            "http://discord.com/channels/111/222/333",
            "https://evil.com/channels/111/222/333",
            "https://discord.com.evil.com/channels/111/222/333",
            "https://beta.discord.com/channels/111/222/333",
            "https://discord.com/channels/@me/222/333",
            "https://discord.com/channels/111/222",
            "https://discord.com/channels/111/222/333/444",
            "https://discord.com/guilds/111/222/333",
            "https://discord.com/channels/111/-222/333",
            "https://discord.com/channels/111/222/99999999999999999999999",
        ] {
            assert_eq!(
                parse_message_link(input),
                Err(Validation::InvalidLink),
                "{input}"
            );
        }
    }

    #[test]
    fn test_validate_binding() {
        assert_eq!(validate_binding(&LINK, 111, 9, 9), Ok(LINK.target()));
    }

    #[test]
    fn test_validate_wrong_guild() {
        assert_eq!(
            validate_binding(&LINK, 112, 9, 9),
            Err(Validation::WrongGuild)
        );
    }

    #[test]
    fn test_validate_not_owned() {
        assert_eq!(
            validate_binding(&LINK, 111, 8, 9),
            Err(Validation::NotOwned)
        );
    }
}
