//! UDP announce request and response bodies.
//!
//! Request body (after the 16-byte connection id, action and transaction id
//! header):
//!
//! ```text
//! Offset  Size    Name
//! 0       20      info_hash
//! 20      20      peer_id
//! 40      8       downloaded
//! 48      8       left
//! 56      8       uploaded
//! 64      4       event (0: none; 1: completed; 2: started; 3: stopped)
//! 68      4       IP address (0: default)
//! 72      4       key
//! 76      4       num_want (-1: default)
//! 80      2       port
//! ```
//!
//! Response body (after the 8-byte action and transaction id header):
//!
//! ```text
//! Offset      Size    Name
//! 0           4       interval
//! 4           4       leechers
//! 8           4       seeders
//! 12 + 6 * n  4       IP address
//! 16 + 6 * n  2       TCP port
//! ```
use std::net::{Ipv4Addr, SocketAddr};
use std::num::NonZeroU16;

use torrust_tracker_client_primitives::{AnnounceInfo, AnnounceQuery, AnnounceResponse, InfoHash, PeerId, PeerList, Progress};
use zerocopy::network_endian::{I32, U16, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use super::{event_code, event_from_code, EncodeError, NUM_WANT_ABSENT};
use crate::codec::compact::{self, Ipv4PeerBytes};
use crate::codec::DecodeError;

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct AnnounceQueryBytes {
    pub info_hash: [u8; 20],
    pub peer_id: [u8; 20],
    pub downloaded: U64,
    pub left: U64,
    pub uploaded: U64,
    pub event: I32,
    pub ip: [u8; 4],
    /// Reserved. Always zero.
    pub key: U32,
    pub num_want: I32,
    pub port: U16,
}

pub const ANNOUNCE_QUERY_LEN: usize = std::mem::size_of::<AnnounceQueryBytes>();

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct AnnounceHeaderBytes {
    pub interval: U32,
    pub leechers: U32,
    pub seeders: U32,
}

pub const ANNOUNCE_HEADER_LEN: usize = std::mem::size_of::<AnnounceHeaderBytes>();

impl From<&AnnounceQuery> for AnnounceQueryBytes {
    fn from(query: &AnnounceQuery) -> Self {
        Self {
            info_hash: query.info_hash.bytes(),
            peer_id: query.peer_id.bytes(),
            downloaded: U64::new(query.progress.downloaded),
            left: U64::new(query.progress.left),
            uploaded: U64::new(query.progress.uploaded),
            event: I32::new(event_code(query.event)),
            ip: query.announced_ip().unwrap_or(Ipv4Addr::UNSPECIFIED).octets(),
            key: U32::new(0),
            num_want: I32::new(query.num_want.map_or(NUM_WANT_ABSENT, i32::from)),
            port: U16::new(query.port.get()),
        }
    }
}

impl TryFrom<&AnnounceQueryBytes> for AnnounceQuery {
    type Error = DecodeError;

    fn try_from(bytes: &AnnounceQueryBytes) -> Result<Self, Self::Error> {
        let ip = Ipv4Addr::from(bytes.ip);

        let num_want = match bytes.num_want.get() {
            NUM_WANT_ABSENT => None,
            value => Some(u16::try_from(value).map_err(|_| DecodeError::InvalidNumWant { value })?),
        };

        let port = NonZeroU16::new(bytes.port.get()).ok_or(DecodeError::IntegerOutOfRange { field: "port", value: 0 })?;

        Ok(AnnounceQuery {
            info_hash: InfoHash(bytes.info_hash),
            peer_id: PeerId(bytes.peer_id),
            port,
            progress: Progress::new(bytes.uploaded.get(), bytes.downloaded.get(), bytes.left.get()),
            ip: if ip.is_unspecified() { None } else { Some(ip) },
            num_want,
            event: event_from_code(bytes.event.get())?,
        })
    }
}

/// Encodes the body of an announce request. The key is always zero.
#[must_use]
pub fn encode_announce_query(query: &AnnounceQuery) -> Vec<u8> {
    AnnounceQueryBytes::from(query).as_bytes().to_vec()
}

/// Decodes the body of an announce request. The key is ignored.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the body is not exactly 82 bytes long
/// or if the event, the number of peers wanted or the port are not valid.
pub fn decode_announce_query(bytes: &[u8]) -> Result<AnnounceQuery, DecodeError> {
    let record = AnnounceQueryBytes::read_from(bytes).ok_or(DecodeError::InvalidLength {
        record: "announce request",
        expected: ANNOUNCE_QUERY_LEN,
        actual: bytes.len(),
    })?;

    AnnounceQuery::try_from(&record)
}

/// Encodes the body of an announce response.
///
/// A failure is written as the raw reason bytes. The transport sends them in
/// an error packet, which is a different response type.
///
/// # Errors
///
/// Will return an [`EncodeError::UnrepresentablePeer`] if a peer has an
/// IPv6 address.
pub fn encode_announce_info(info: &AnnounceInfo) -> Result<Vec<u8>, EncodeError> {
    let response = match info {
        AnnounceInfo::Failure { reason } => return Ok(reason.as_bytes().to_vec()),
        AnnounceInfo::Success(response) => response,
    };

    let header = AnnounceHeaderBytes {
        interval: U32::new(response.interval),
        leechers: U32::new(response.incomplete.unwrap_or_default()),
        seeders: U32::new(response.complete.unwrap_or_default()),
    };

    let mut bytes = Vec::with_capacity(ANNOUNCE_HEADER_LEN + compact::IPV4_PEER_LEN * response.peers.len());

    bytes.extend_from_slice(header.as_bytes());

    for peer in &response.peers {
        match peer.peer_addr {
            SocketAddr::V4(addr) => bytes.extend_from_slice(Ipv4PeerBytes::from(addr).as_bytes()),
            SocketAddr::V6(_) => {
                return Err(EncodeError::UnrepresentablePeer {
                    peer_addr: peer.peer_addr,
                })
            }
        }
    }

    Ok(bytes)
}

/// Decodes the body of an announce response from an IPv4 tracker.
///
/// The binary format carries neither the minimum interval, the warning nor
/// the tracker id, so they are always absent.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the body is shorter than the 12-byte
/// header or if the peers are not a sequence of 6-byte records.
pub fn decode_announce_info(bytes: &[u8]) -> Result<AnnounceInfo, DecodeError> {
    decode_announce_response(bytes, compact::decode_peers_v4)
}

/// Decodes the body of an announce response from an IPv6 tracker, whose
/// peer records are 18 bytes long.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the body is shorter than the 12-byte
/// header or if the peers are not a sequence of 18-byte records.
pub fn decode_announce_info_v6(bytes: &[u8]) -> Result<AnnounceInfo, DecodeError> {
    decode_announce_response(bytes, compact::decode_peers_v6)
}

fn decode_announce_response(
    bytes: &[u8],
    decode_peers: fn(&'static str, &[u8]) -> Result<PeerList, DecodeError>,
) -> Result<AnnounceInfo, DecodeError> {
    let header = AnnounceHeaderBytes::read_from_prefix(bytes).ok_or(DecodeError::InvalidLength {
        record: "announce response",
        expected: ANNOUNCE_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let peers = decode_peers("peers", &bytes[ANNOUNCE_HEADER_LEN..])?;

    Ok(AnnounceInfo::Success(AnnounceResponse {
        complete: Some(header.seeders.get()),
        incomplete: Some(header.leechers.get()),
        interval: header.interval.get(),
        min_interval: None,
        peers,
        warning: None,
        tracker_id: None,
    }))
}

/// Decodes the message of an error packet.
#[must_use]
pub fn decode_failure(bytes: &[u8]) -> AnnounceInfo {
    AnnounceInfo::Failure {
        reason: String::from_utf8_lossy(bytes).into_owned(),
    }
}
