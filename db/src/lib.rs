mod errors;
mod registry;
mod store;
pub mod structs;

pub use errors::{Error, Result};
pub use registry::Registry;
pub use store::{Store, DEFAULT_STATE_PATH};
pub use structs::record::{validate_template, DEFAULT_TEMPLATE, PLACEHOLDER};
pub use structs::{CounterRecord, DisplayBinding, DisplayMode, MessageTarget};
