use db::{CounterRecord, PLACEHOLDER};
use lazy_static::lazy_static;
use regex::Regex;

/// Discord allows 100, leave a little room.
pub const MAX_CHANNEL_NAME_LEN: usize = 95;

/// The text shown for a record: its template with the day count filled in.
pub fn render(record: &CounterRecord) -> String {
    record
        .template()
        .replacen(PLACEHOLDER, &record.days.to_string(), 1)
}

/// Lowercases `text` and replaces anything Discord won't accept in a
/// channel name with `-`.
pub fn sanitize_channel_name(text: &str) -> String {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
    }
    let mut name = RE.replace_all(&text.to_lowercase(), "-").into_owned();
    // only ascii is left, so this can't split a char
    name.truncate(MAX_CHANNEL_NAME_LEN);
    name
}
