use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

use crate::structs::record::PLACEHOLDER;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The state file exists but does not describe a valid set of records.
    CorruptState(String),
    MissingPlaceholder,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(inner) => fmt::Display::fmt(&inner, f),
            Error::Json(inner) => fmt::Display::fmt(&inner, f),
            Error::CorruptState(inner) => write!(f, "corrupt state file: {inner}"),
            Error::MissingPlaceholder => {
                write!(f, "template must contain `{PLACEHOLDER}` exactly once")
            }
        }
    }
}

impl StdError for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}
