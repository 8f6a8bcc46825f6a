//! On-disk shape of a record. Kept separate from [`CounterRecord`] so the
//! file layout can stay loose (nullable ids, a mode string) while the record
//! itself only ever holds valid combinations.

use super::record::{CounterRecord, DisplayBinding, DisplayMode, MessageTarget};
use crate::errors::{Error, Result};

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StoredRecord {
    days: u64,
    message_id: Option<u64>,
    channel_id: Option<u64>,
    mode: DisplayMode,
    template: String,
    channel_name_channel_id: Option<u64>,
}

impl StoredRecord {
    pub(crate) fn from_record(record: &CounterRecord) -> StoredRecord {
        let target = record.message_target();
        StoredRecord {
            days: record.days,
            message_id: target.map(|t| t.message),
            channel_id: target.map(|t| t.channel),
            mode: record.mode(),
            template: record.template().to_string(),
            channel_name_channel_id: record.rename_channel(),
        }
    }

    /// Converts into a record, dropping any target that does not belong to
    /// the stored mode. A half-written message binding (only one of the two
    /// ids) is treated as unbound.
    pub(crate) fn into_record(self, guild_id: u64) -> Result<CounterRecord> {
        let binding = match self.mode {
            DisplayMode::Message => {
                if self.channel_name_channel_id.is_some() {
                    info!("guild {guild_id}: ignoring rename channel while in message mode");
                }
                match (self.channel_id, self.message_id) {
                    (Some(channel), Some(message)) => {
                        DisplayBinding::Message(Some(MessageTarget { channel, message }))
                    }
                    (None, None) => DisplayBinding::Message(None),
                    _ => {
                        info!("guild {guild_id}: incomplete message binding, treating as unbound");
                        DisplayBinding::Message(None)
                    }
                }
            }
            DisplayMode::ChannelName => {
                if self.channel_id.is_some() || self.message_id.is_some() {
                    info!("guild {guild_id}: ignoring bound message while in channel_name mode");
                }
                DisplayBinding::ChannelName(self.channel_name_channel_id)
            }
        };

        CounterRecord::from_parts(guild_id, self.days, self.template, binding).map_err(|_| {
            Error::CorruptState(format!("guild {guild_id} has an invalid template"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> serde_json::Result<StoredRecord> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_layout_matches_file_format() {
        let mut record = CounterRecord::new(5);
        record.days = 12;
        record.bind_message(MessageTarget {
            channel: 100,
            message: 200,
        });

        let value = serde_json::to_value(StoredRecord::from_record(&record)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "days": 12,
                "message_id": 200,
                "channel_id": 100,
                "mode": "message",
                "template": "{days} days since the last incident",
                "channel_name_channel_id": null
            })
        );
    }

    #[test]
    fn test_channel_name_mode() -> Result<()> {
        let stored = parse(
            r#"{"days": 3, "message_id": null, "channel_id": null, "mode": "channel_name",
                "template": "{days}-days", "channel_name_channel_id": 42}"#,
        )?;
        let record = stored.into_record(9)?;

        assert_eq!(record.guild_id(), 9);
        assert_eq!(record.days, 3);
        assert_eq!(record.rename_channel(), Some(42));
        assert_eq!(record.message_target(), None);
        Ok(())
    }

    #[test]
    fn test_half_binding_is_unbound() -> Result<()> {
        // a message deleted under an older version left the channel id behind
        let stored = parse(
            r#"{"days": 3, "message_id": null, "channel_id": 77, "mode": "message",
                "template": "{days} days", "channel_name_channel_id": null}"#,
        )?;
        assert_eq!(stored.into_record(1)?.message_target(), None);
        Ok(())
    }

    #[test]
    fn test_inactive_mode_target_dropped() -> Result<()> {
        let stored = parse(
            r#"{"days": 3, "message_id": 1, "channel_id": 2, "mode": "channel_name",
                "template": "{days} days", "channel_name_channel_id": 8}"#,
        )?;
        let record = stored.into_record(1)?;
        assert_eq!(record.message_target(), None);
        assert_eq!(record.rename_channel(), Some(8));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_shapes() {
        // negative count
        assert!(parse(
            r#"{"days": -1, "message_id": null, "channel_id": null, "mode": "message",
                "template": "{days}", "channel_name_channel_id": null}"#
        )
        .is_err());
        // unknown mode
        assert!(parse(
            r#"{"days": 1, "message_id": null, "channel_id": null, "mode": "topic",
                "template": "{days}", "channel_name_channel_id": null}"#
        )
        .is_err());
        // extra field
        assert!(parse(
            r#"{"days": 1, "message_id": null, "channel_id": null, "mode": "message",
                "template": "{days}", "channel_name_channel_id": null, "extra": true}"#
        )
        .is_err());
        // missing count
        assert!(parse(
            r#"{"message_id": null, "channel_id": null, "mode": "message",
                "template": "{days}", "channel_name_channel_id": null}"#
        )
        .is_err());
    }

    #[test]
    fn test_template_without_placeholder_is_corrupt() -> Result<()> {
        let stored = parse(
            r#"{"days": 1, "message_id": null, "channel_id": null, "mode": "message",
                "template": "no days here", "channel_name_channel_id": null}"#,
        )?;
        assert!(matches!(stored.into_record(1), Err(Error::CorruptState(_))));
        Ok(())
    }
}
