//! Compact peer lists.
//!
//! A compact peer list is a byte string with one fixed-size record per peer:
//! the IP address followed by the port, both in network byte order. IPv4
//! records take 6 bytes and IPv6 records ([BEP 7](https://www.bittorrent.org/beps/bep_0007.html))
//! take 18 bytes.
//!
//! Both the HTTP `peers` string and the tail of a UDP announce response use
//! this format.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4};

use torrust_tracker_client_primitives::{Peer, PeerList};
use zerocopy::network_endian::U16;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use super::DecodeError;

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Ipv4PeerBytes {
    pub ip: [u8; 4],
    pub port: U16,
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Ipv6PeerBytes {
    pub ip: [u8; 16],
    pub port: U16,
}

pub const IPV4_PEER_LEN: usize = std::mem::size_of::<Ipv4PeerBytes>();
pub const IPV6_PEER_LEN: usize = std::mem::size_of::<Ipv6PeerBytes>();

impl From<SocketAddrV4> for Ipv4PeerBytes {
    fn from(addr: SocketAddrV4) -> Self {
        Self {
            ip: addr.ip().octets(),
            port: U16::new(addr.port()),
        }
    }
}

impl From<Ipv4PeerBytes> for Peer {
    fn from(record: Ipv4PeerBytes) -> Self {
        Peer::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::from(record.ip)), record.port.get()))
    }
}

impl From<Ipv6PeerBytes> for Peer {
    fn from(record: Ipv6PeerBytes) -> Self {
        Peer::new(SocketAddr::new(IpAddr::V6(Ipv6Addr::from(record.ip)), record.port.get()))
    }
}

/// Decodes a compact IPv4 peer list. Peers keep the order of the records.
///
/// # Errors
///
/// Will return a [`DecodeError::MisalignedRecords`] if the length is not a
/// multiple of 6.
pub fn decode_peers_v4(field: &'static str, bytes: &[u8]) -> Result<PeerList, DecodeError> {
    decode_records::<Ipv4PeerBytes>(field, IPV4_PEER_LEN, bytes)
}

/// Decodes a compact IPv6 peer list.
///
/// # Errors
///
/// Will return a [`DecodeError::MisalignedRecords`] if the length is not a
/// multiple of 18.
pub fn decode_peers_v6(field: &'static str, bytes: &[u8]) -> Result<PeerList, DecodeError> {
    decode_records::<Ipv6PeerBytes>(field, IPV6_PEER_LEN, bytes)
}

fn decode_records<T>(field: &'static str, size: usize, bytes: &[u8]) -> Result<PeerList, DecodeError>
where
    T: FromBytes + Into<Peer>,
{
    if bytes.len() % size != 0 {
        return Err(DecodeError::MisalignedRecords {
            record: field,
            size,
            len: bytes.len(),
        });
    }

    let mut peers = PeerList::default();

    for chunk in bytes.chunks_exact(size) {
        let record = T::read_from(chunk).ok_or(DecodeError::InvalidLength {
            record: field,
            expected: size,
            actual: chunk.len(),
        })?;
        peers.push(record.into());
    }

    Ok(peers)
}
