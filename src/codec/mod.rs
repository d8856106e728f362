//! Wire encodings of the announce and scrape messages.
//!
//! The same messages have two encodings:
//!
//! - [`http`]: URL query parameters for the requests and bencoded
//!   dictionaries for the responses.
//! - [`udp`]: fixed-width big-endian binary records.
//!
//! All the functions in this module are pure. The transports decide which
//! function to call for each packet or body they receive.
pub mod compact;
pub mod http;
pub mod udp;

use std::sync::Arc;

use thiserror::Error;

/// The received bytes do not match the expected wire shape.
///
/// Decoding is all-or-nothing: a message that fails to decode never yields a
/// partially populated value.
#[derive(Error, Debug, Clone)]
pub enum DecodeError {
    #[error("invalid bencoded value: {source}")]
    InvalidBencode { source: Arc<serde_bencode::Error> },

    #[error("expected a dictionary for `{field}`")]
    InvalidValueExpectedDict { field: &'static str },

    #[error("missing mandatory field `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid value for `{field}`, expected {expected}")]
    InvalidFieldType { field: &'static str, expected: &'static str },

    #[error("value {value} out of range for `{field}`")]
    IntegerOutOfRange { field: &'static str, value: i64 },

    #[error("`peers` is neither a list of dictionaries nor a compact string")]
    InvalidPeers,

    #[error("invalid peer id, expected 20 bytes, got {len}")]
    InvalidPeerId { len: usize },

    #[error("invalid info-hash, expected 20 bytes, got {len}")]
    InvalidInfoHash { len: usize },

    #[error("invalid length for `{record}`: {len} bytes is not a multiple of {size}")]
    MisalignedRecords { record: &'static str, size: usize, len: usize },

    #[error("invalid length for `{record}`: expected {expected} bytes, got {actual}")]
    InvalidLength {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown announce event code {code}")]
    UnknownEvent { code: i32 },

    #[error("invalid number of peers wanted {value}")]
    InvalidNumWant { value: i32 },

    #[error("received {actual} scrape records for {expected} requested info-hashes")]
    TooManyRecords { expected: usize, actual: usize },
}

impl From<serde_bencode::Error> for DecodeError {
    fn from(err: serde_bencode::Error) -> Self {
        Self::InvalidBencode { source: Arc::new(err) }
    }
}
