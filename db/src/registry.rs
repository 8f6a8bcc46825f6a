use crate::errors::Result;
use crate::store::Store;
use crate::structs::CounterRecord;

use log::{debug, warn};
use std::collections::BTreeMap;

/// In-memory view of every guild's counter, backed by a [`Store`]. Each
/// successful mutation is written through before it returns.
#[derive(Debug)]
pub struct Registry {
    store: Store,
    records: BTreeMap<u64, CounterRecord>,
}

impl Registry {
    /// Loads all records from `store`.
    pub fn open(store: Store) -> Result<Registry> {
        let records = store.load()?;
        Ok(Registry { store, records })
    }

    /// Returns the record for `guild_id`, creating a default one in memory
    /// if the guild has never been seen. Creation alone is not persisted.
    pub fn get(&mut self, guild_id: u64) -> &CounterRecord {
        self.records.entry(guild_id).or_insert_with(|| {
            debug!("creating record for guild {guild_id}");
            CounterRecord::new(guild_id)
        })
    }

    /// Returns the record only if one already exists.
    pub fn existing(&self, guild_id: u64) -> Option<&CounterRecord> {
        self.records.get(&guild_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies `f` to the guild's record and flushes the whole mapping.
    ///
    /// `f` works on a copy: if it fails, or the flush fails, the record in
    /// memory is left as it was.
    pub fn update<F, T>(&mut self, guild_id: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut CounterRecord) -> Result<T>,
    {
        let mut record = self
            .records
            .get(&guild_id)
            .cloned()
            .unwrap_or_else(|| CounterRecord::new(guild_id));
        let ret = f(&mut record)?;

        let previous = self.records.insert(guild_id, record);
        if let Err(why) = self.store.save(&self.records) {
            warn!("failed to persist guild {guild_id}, rolling back: {why}");
            match previous {
                Some(previous) => self.records.insert(guild_id, previous),
                None => self.records.remove(&guild_id),
            };
            return Err(why);
        }

        Ok(ret)
    }

    /// Like [`Registry::update`], but `f` reports whether it changed anything
    /// and the mapping is only flushed when it did.
    pub fn update_if_changed<F>(&mut self, guild_id: u64, f: F) -> Result<bool>
    where
        F: FnOnce(&mut CounterRecord) -> bool,
    {
        let mut record = match self.records.get(&guild_id) {
            Some(record) => record.clone(),
            None => return Ok(false),
        };
        if !f(&mut record) {
            debug!("guild {guild_id}: nothing changed, skipping flush");
            return Ok(false);
        }
        self.update(guild_id, |stored| {
            *stored = record;
            Ok(true)
        })
    }
}
