use crate::errors::{Error, Result};

use db::{CounterRecord, Registry};
use std::sync::{Mutex, MutexGuard};

/// The registry shared by every command handler. The lock is only held for
/// the synchronous read or update, never across a platform call.
#[derive(Debug)]
pub struct State {
    registry: Mutex<Registry>,
}

impl State {
    pub fn new(registry: Registry) -> State {
        State {
            registry: Mutex::new(registry),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>> {
        self.registry
            .lock()
            .map_err(|_why| Error::ConstStr("Failed to acquire lock on registry"))
    }

    /// A copy of the guild's record, created with defaults if needed.
    pub fn record(&self, guild_id: u64) -> Result<CounterRecord> {
        Ok(self.lock()?.get(guild_id).clone())
    }

    pub fn existing(&self, guild_id: u64) -> Result<Option<CounterRecord>> {
        Ok(self.lock()?.existing(guild_id).cloned())
    }

    /// Mutates and persists the guild's record, returning whatever `f` does.
    pub fn update<F, T>(&self, guild_id: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut CounterRecord) -> db::Result<T>,
    {
        Ok(self.lock()?.update(guild_id, f)?)
    }

    /// Mutates the guild's record, persisting only if `f` returns true.
    pub fn update_if_changed<F>(&self, guild_id: u64, f: F) -> Result<bool>
    where
        F: FnOnce(&mut CounterRecord) -> bool,
    {
        Ok(self.lock()?.update_if_changed(guild_id, f)?)
    }
}
