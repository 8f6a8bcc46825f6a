use crate::errors::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Substituted with the current day count when a record is rendered.
pub const PLACEHOLDER: &str = "{days}";
pub const DEFAULT_TEMPLATE: &str = "{days} days since the last incident";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Message,
    ChannelName,
}

impl DisplayMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Message => "message",
            DisplayMode::ChannelName => "channel_name",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message the bot posted and keeps editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageTarget {
    pub channel: u64,
    pub message: u64,
}

/// Where a record is currently shown. Each mode carries at most one target,
/// so a record can never be bound to a message and a channel at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBinding {
    Message(Option<MessageTarget>),
    ChannelName(Option<u64>),
}

impl Default for DisplayBinding {
    fn default() -> Self {
        DisplayBinding::Message(None)
    }
}

impl DisplayBinding {
    pub const fn mode(&self) -> DisplayMode {
        match self {
            DisplayBinding::Message(_) => DisplayMode::Message,
            DisplayBinding::ChannelName(_) => DisplayMode::ChannelName,
        }
    }
}

/// Returns an error unless `text` holds the placeholder exactly once.
pub fn validate_template(text: &str) -> Result<()> {
    if text.matches(PLACEHOLDER).count() == 1 {
        Ok(())
    } else {
        Err(Error::MissingPlaceholder)
    }
}

/// The authoritative counter of one guild. Displays are projections of this
/// and can be regenerated from it at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    guild_id: u64,
    pub days: u64,
    template: String,
    binding: DisplayBinding,
}

impl CounterRecord {
    pub fn new(guild_id: u64) -> CounterRecord {
        CounterRecord {
            guild_id,
            days: 0,
            template: DEFAULT_TEMPLATE.to_string(),
            binding: DisplayBinding::default(),
        }
    }

    pub(crate) fn from_parts(
        guild_id: u64,
        days: u64,
        template: String,
        binding: DisplayBinding,
    ) -> Result<CounterRecord> {
        validate_template(&template)?;
        Ok(CounterRecord {
            guild_id,
            days,
            template,
            binding,
        })
    }

    #[inline(always)]
    pub const fn guild_id(&self) -> u64 {
        self.guild_id
    }

    #[inline(always)]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline(always)]
    pub const fn binding(&self) -> DisplayBinding {
        self.binding
    }

    #[inline(always)]
    pub const fn mode(&self) -> DisplayMode {
        self.binding.mode()
    }

    pub const fn message_target(&self) -> Option<MessageTarget> {
        match self.binding {
            DisplayBinding::Message(target) => target,
            DisplayBinding::ChannelName(_) => None,
        }
    }

    pub const fn rename_channel(&self) -> Option<u64> {
        match self.binding {
            DisplayBinding::ChannelName(channel) => channel,
            DisplayBinding::Message(_) => None,
        }
    }

    /// Replaces the template, leaving the old one in place if `text` is invalid.
    pub fn set_template(&mut self, text: &str) -> Result<()> {
        validate_template(text)?;
        self.template = text.to_string();
        Ok(())
    }

    pub fn increment(&mut self) {
        self.days = self.days.saturating_add(1);
    }

    /// Switches to message mode and makes `target` the only display.
    pub fn bind_message(&mut self, target: MessageTarget) {
        self.binding = DisplayBinding::Message(Some(target));
    }

    /// Switches to channel name mode, renaming `channel` from now on.
    pub fn bind_rename_channel(&mut self, channel: u64) {
        self.binding = DisplayBinding::ChannelName(Some(channel));
    }

    /// Switches to message mode. An existing message binding is kept.
    pub fn use_message_mode(&mut self) {
        if let DisplayBinding::ChannelName(_) = self.binding {
            self.binding = DisplayBinding::Message(None);
        }
    }

    /// Drops the message binding if it still points at `expected`. Returns
    /// whether anything was cleared; a binding changed in the meantime by
    /// another command is left alone.
    pub fn clear_message_target(&mut self, expected: MessageTarget) -> bool {
        if self.message_target() == Some(expected) {
            self.binding = DisplayBinding::Message(None);
            true
        } else {
            false
        }
    }
}
