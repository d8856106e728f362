//! Peers as returned by a tracker in an announce response.
//!
//! A sample peer list with one peer that sent its ID (dictionary model) and
//! one without it (compact model):
//!
//! ```rust
//! use std::net::{IpAddr, Ipv4Addr, SocketAddr};
//!
//! use torrust_tracker_client_primitives::peer::{Peer, PeerId, PeerList};
//!
//! let peers: PeerList = vec![
//!     Peer::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080)).with_id(PeerId(*b"-qB00000000000000001")),
//!     Peer::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 2)), 8081)),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(peers.len(), 2);
//! ```
use std::net::SocketAddr;

/// `BitTorrent` peer ID: a 20-byte identifier chosen by each client
/// instance.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, PartialOrd, Ord)]
pub struct PeerId(pub [u8; 20]);

pub const PEER_ID_BYTES_LEN: usize = 20;

impl PeerId {
    /// Returns the `PeerId` internal byte array.
    #[must_use]
    pub fn bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Builds a `PeerId` from a slice, if it has exactly 20 bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; PEER_ID_BYTES_LEN]>::try_from(bytes).ok().map(Self)
    }
}

impl From<[u8; 20]> for PeerId {
    fn from(val: [u8; 20]) -> Self {
        PeerId(val)
    }
}

/// A peer address received from the tracker.
///
/// Only the dictionary peer list model (non compact) carries the peer ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Peer {
    /// ID of the peer, when the tracker sent it.
    pub peer_id: Option<PeerId>,
    /// The IP and port this peer is listening on.
    pub peer_addr: SocketAddr,
}

impl Peer {
    #[must_use]
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self { peer_id: None, peer_addr }
    }

    #[must_use]
    pub fn with_id(mut self, peer_id: PeerId) -> Self {
        self.peer_id = Some(peer_id);
        self
    }
}

/// Ordered list of peers.
///
/// The order is the order in which the tracker sent them. It can be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PeerList {
    peers: Vec<Peer>,
}

impl PeerList {
    #[must_use]
    pub fn new(peers: Vec<Peer>) -> Self {
        Self { peers }
    }

    pub fn push(&mut self, peer: Peer) {
        self.peers.push(peer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peer> {
        self.peers.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Peer] {
        &self.peers
    }

    /// The peer addresses, in the order the tracker sent them.
    #[must_use]
    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.peers.iter().map(|peer| peer.peer_addr).collect()
    }
}

impl FromIterator<Peer> for PeerList {
    fn from_iter<T: IntoIterator<Item = Peer>>(iter: T) -> Self {
        Self {
            peers: iter.into_iter().collect(),
        }
    }
}

impl Extend<Peer> for PeerList {
    fn extend<T: IntoIterator<Item = Peer>>(&mut self, iter: T) {
        self.peers.extend(iter);
    }
}

impl IntoIterator for PeerList {
    type Item = Peer;
    type IntoIter = std::vec::IntoIter<Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.into_iter()
    }
}

impl<'a> IntoIterator for &'a PeerList {
    type Item = &'a Peer;
    type IntoIter = std::slice::Iter<'a, Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.iter()
    }
}
