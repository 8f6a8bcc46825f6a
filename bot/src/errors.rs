use db::PLACEHOLDER;

use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

use crate::handler::commands::counter::MAX_DAYS;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Serenity(serenity::Error),
    Db(db::Error),
    /// The platform refused the request (HTTP 403).
    Forbidden,
    Validation(Validation),
    MissingEnv(&'static str),
    ConstStr(&'static str),
}

impl Error {
    #[inline(always)]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Error::Forbidden)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serenity(inner) => fmt::Display::fmt(&inner, f),
            Error::Db(inner) => fmt::Display::fmt(&inner, f),
            Error::Validation(inner) => fmt::Display::fmt(&inner, f),
            Error::Forbidden => f.write_str("Missing permissions"),
            Error::MissingEnv(var) => write!(f, "Set the {var} environment variable"),
            Error::ConstStr(inner) => f.write_str(inner),
        }
    }
}

impl StdError for Error {}

impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Error {
        Error::Serenity(e)
    }
}

impl From<db::Error> for Error {
    fn from(e: db::Error) -> Error {
        match e {
            db::Error::MissingPlaceholder => Error::Validation(Validation::MissingPlaceholder),
            other => Error::Db(other),
        }
    }
}

impl From<Validation> for Error {
    fn from(e: Validation) -> Error {
        Error::Validation(e)
    }
}

/// Bad input from whoever ran a command. The display text is sent back to
/// them privately and nothing is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    UnknownCommand,
    NotInGuild,
    NotOwner,
    DaysOutOfRange,
    InvalidLink,
    WrongGuild,
    NotOwned,
    MessageUnavailable,
    MissingPlaceholder,
    MissingChannel,
}

impl Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::UnknownCommand => f.write_str("Unrecognized command"),
            Validation::NotInGuild => f.write_str("This command only works inside a server."),
            Validation::NotOwner => f.write_str("Only the bot owner can use this."),
            Validation::DaysOutOfRange => write!(f, "Days must be between 0 and {MAX_DAYS}."),
            Validation::InvalidLink => f.write_str("Invalid message URL."),
            Validation::WrongGuild => f.write_str("That message is not in this server."),
            Validation::NotOwned => f.write_str(
                "I can only bind to **my own** messages. Use /counter post to create one.",
            ),
            Validation::MessageUnavailable => f.write_str("Could not fetch that message."),
            Validation::MissingPlaceholder => {
                write!(f, "Template must include `{PLACEHOLDER}` exactly once.")
            }
            Validation::MissingChannel => {
                f.write_str("Choose a channel to rename in channel_name mode.")
            }
        }
    }
}

impl StdError for Validation {}
