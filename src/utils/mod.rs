pub mod date;
pub mod serde_ts;
pub mod time;

pub use date::{parse_optional_timestamp, parse_timestamp, today};
