use crate::errors::{Error, Result};

use db::DEFAULT_STATE_PATH;
use std::env;
use std::path::PathBuf;

pub const TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
pub const STATE_FILE_VAR: &str = "STATE_FILE";

#[derive(Debug)]
pub struct Config {
    pub token: String,
    pub state_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_vars(|key| env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = var(TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or(Error::MissingEnv(TOKEN_VAR))?;
        let state_file = var(STATE_FILE_VAR)
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);

        Ok(Config { token, state_file })
    }
}
