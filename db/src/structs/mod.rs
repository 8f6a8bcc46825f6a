pub mod record;
pub(crate) mod stored;

pub use record::{CounterRecord, DisplayBinding, DisplayMode, MessageTarget};
