pub mod reply;

pub use reply::{Followup, Reply, ReplyType, Response};
