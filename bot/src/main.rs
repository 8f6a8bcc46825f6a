#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod binding;
mod config;
mod display;
mod errors;
mod handler;
mod state;
mod structs;

use log::LevelFilter;
use log::{error, info};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use simple_logger::SimpleLogger;

use std::process;

use config::Config;
use db::{Registry, Store};
use handler::Handler;
use state::State;

fn open_registry(config: &Config) -> Registry {
    match Registry::open(Store::new(&config.state_file)) {
        Ok(registry) => {
            info!(
                "loaded {} guild records from {}",
                registry.len(),
                config.state_file.display()
            );
            registry
        }
        Err(why) => {
            error!("Failed to load state, exiting {why}");
            process::exit(-1);
        }
    }
}

#[tokio::main]
async fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("days_since_bot", LevelFilter::Debug)
        .with_module_level("db", LevelFilter::Debug)
        .with_utc_timestamps()
        .init()
        .expect("Failed to initialise logger");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!("{why}");
            process::exit(-1);
        }
    };
    let registry = open_registry(&config);

    // slash commands and editing our own messages need no privileged intents
    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler::new(State::new(registry)))
        .await
        .expect("Err creating client");

    // Finally, start a single shard, and start listening to events.
    //
    // Shards will automatically attempt to reconnect, and will perform
    // exponential backoff until it reconnects.
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
