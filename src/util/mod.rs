mod query;
mod time;

pub use query::QueryParams;
pub use time::{format_timestamp, now_timestamp, parse_timestamp};
