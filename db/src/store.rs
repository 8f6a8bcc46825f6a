use crate::errors::{Error, Result};
use crate::structs::stored::StoredRecord;
use crate::structs::CounterRecord;

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_PATH: &str = "./state.json";

/// A JSON file holding every guild's record, keyed by the stringified
/// guild id. The file is always replaced whole.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Default for Store {
    fn default() -> Self {
        Store::new(DEFAULT_STATE_PATH)
    }
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Store {
        Store { path: path.into() }
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Reads every record. A missing file is an empty mapping, anything
    /// unreadable is [`Error::CorruptState`].
    pub fn load(&self) -> Result<BTreeMap<u64, CounterRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(why) if why.kind() == ErrorKind::NotFound => {
                info!("no state at {}, starting empty", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(why) => return Err(why.into()),
        };

        let raw: BTreeMap<String, StoredRecord> = serde_json::from_str(&contents)
            .map_err(|why| Error::CorruptState(format!("{}: {why}", self.path.display())))?;

        let mut records = BTreeMap::new();
        for (key, stored) in raw {
            let guild_id = key
                .parse::<u64>()
                .map_err(|_| Error::CorruptState(format!("`{key}` is not a guild id")))?;
            records.insert(guild_id, stored.into_record(guild_id)?);
        }

        debug!("loaded {} guild records", records.len());
        Ok(records)
    }

    /// Writes every record to a temp file next to the state file and renames
    /// it into place, so a crash mid-write never leaves a torn file behind.
    pub fn save(&self, records: &BTreeMap<u64, CounterRecord>) -> Result<()> {
        let out: BTreeMap<String, StoredRecord> = records
            .iter()
            .map(|(id, record)| (id.to_string(), StoredRecord::from_record(record)))
            .collect();
        let contents = serde_json::to_string_pretty(&out)?;

        let tmp = self.temp_path();
        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(contents.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(why) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("failed to remove {}: {cleanup}", tmp.display());
                }
            }
            return Err(why.into());
        }

        debug!("saved {} guild records", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::MessageTarget;
    use tempfile::tempdir;

    fn sample() -> BTreeMap<u64, CounterRecord> {
        let mut first = CounterRecord::new(1);
        first.days = 5000;
        first.bind_message(MessageTarget {
            channel: 11,
            message: 12,
        });

        let mut second = CounterRecord::new(2);
        second.set_template("{days}-days-clean").unwrap();
        second.bind_rename_channel(21);

        let third = CounterRecord::new(u64::MAX);

        BTreeMap::from([(1, first), (2, second), (u64::MAX, third)])
    }

    #[test]
    fn test_missing_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::new(dir.path().join("state.json"));
        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::new(dir.path().join("state.json"));
        let records = sample();

        store.save(&records)?;
        assert_eq!(store.load()?, records);
        Ok(())
    }

    #[test]
    fn test_save_replaces_and_cleans_temp() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::new(dir.path().join("state.json"));
        let mut records = sample();
        store.save(&records)?;

        records.remove(&2);
        store.save(&records)?;

        assert_eq!(store.load()?, records);
        assert!(!store.temp_path().exists());
        Ok(())
    }

    #[test]
    fn test_failed_save_cleans_temp() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::new(dir.path().join("state.json"));
        // a directory in the way makes the final rename fail
        fs::create_dir(store.path())?;
        fs::write(store.path().join("keep"), "")?;

        assert!(matches!(store.save(&sample()), Err(Error::Io(_))));
        assert!(!store.temp_path().exists());
        assert!(store.path().is_dir());
        Ok(())
    }

    #[test]
    fn test_keys_are_stringified_ids() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::new(dir.path().join("state.json"));
        store.save(&sample())?;

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
        let object = raw.as_object().unwrap();
        assert!(object.contains_key("1"));
        assert!(object.contains_key("2"));
        assert!(object.contains_key(&u64::MAX.to_string()));
        assert_eq!(object["2"]["mode"], "channel_name");
        assert_eq!(object["2"]["channel_name_channel_id"], 21);
        Ok(())
    }

    #[test]
    fn test_reads_file_written_by_older_bot() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
  "123456789012345678": {
    "days": 14,
    "message_id": 223456789012345678,
    "channel_id": 323456789012345678,
    "mode": "message",
    "template": "{days} days since Sean and Patrick talked about tanks",
    "channel_name_channel_id": null
  }
}"#,
        )?;

        let records = Store::new(path).load()?;
        let record = &records[&123456789012345678];
        assert_eq!(record.days, 14);
        assert_eq!(
            record.message_target(),
            Some(MessageTarget {
                channel: 323456789012345678,
                message: 223456789012345678,
            })
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_files() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        let store = Store::new(&path);

        for contents in [
            "{ not json",
            "[]",
            r#"{"guild": {"days": 1, "message_id": null, "channel_id": null,
                "mode": "message", "template": "{days}", "channel_name_channel_id": null}}"#,
            r#"{"1": {"days": "one"}}"#,
        ] {
            fs::write(&path, contents)?;
            assert!(
                matches!(store.load(), Err(Error::CorruptState(_))),
                "accepted {contents}"
            );
        }
        Ok(())
    }
}
