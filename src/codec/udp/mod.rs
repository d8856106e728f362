//! UDP tracker encoding.
//!
//! The payload bodies of [BEP 15](https://www.bittorrent.org/beps/bep_0015.html)
//! packets: fixed-width big-endian integers with exact byte counts. The
//! connect handshake and the action/transaction-id framing belong to the
//! transport ([`crate::rpc::udp`]).
pub mod announce;
pub mod scrape;

use std::net::SocketAddr;

use thiserror::Error;
use torrust_tracker_client_primitives::AnnounceEvent;

use super::DecodeError;

pub use self::announce::{
    decode_announce_info, decode_announce_info_v6, decode_announce_query, decode_failure, encode_announce_info,
    encode_announce_query,
};
pub use self::scrape::{
    decode_scrape, decode_scrape_info, decode_scrape_query, encode_scrape, encode_scrape_info, encode_scrape_query,
};

/// Stored in the `num_want` field when the client leaves the number of
/// peers up to the tracker.
pub const NUM_WANT_ABSENT: i32 = -1;

/// A value the binary format can not carry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("peer {peer_addr} can not be encoded in an IPv4 peer record")]
    UnrepresentablePeer { peer_addr: SocketAddr },
}

/// The event code of the announce request.
///
/// The codes are fixed by the wire protocol: `0` no event (regular
/// announce), `1` completed, `2` started and `3` stopped.
#[must_use]
pub fn event_code(event: Option<AnnounceEvent>) -> i32 {
    match event {
        None => 0,
        Some(AnnounceEvent::Completed) => 1,
        Some(AnnounceEvent::Started) => 2,
        Some(AnnounceEvent::Stopped) => 3,
    }
}

/// # Errors
///
/// Will return a [`DecodeError::UnknownEvent`] for any code other than
/// `0`, `1`, `2` and `3`.
pub fn event_from_code(code: i32) -> Result<Option<AnnounceEvent>, DecodeError> {
    match code {
        0 => Ok(None),
        1 => Ok(Some(AnnounceEvent::Completed)),
        2 => Ok(Some(AnnounceEvent::Started)),
        3 => Ok(Some(AnnounceEvent::Stopped)),
        code => Err(DecodeError::UnknownEvent { code }),
    }
}
