//! Utility modules for sandesh-codec.

pub mod datetime;

pub use datetime::{format_timestamp, now_unix_secs, parse_timestamp};
