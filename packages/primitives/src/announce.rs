//! Announce request and response.
//!
//! See [BEP 3. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html)
//! and [BEP 15. UDP Tracker Protocol for `BitTorrent`](https://www.bittorrent.org/beps/bep_0015.html).
use std::net::Ipv4Addr;
use std::num::NonZeroU16;

use derive_more::Constructor;
use thiserror::Error;

use crate::announce_event::AnnounceEvent;
use crate::info_hash::InfoHash;
use crate::peer::{PeerId, PeerList};
use crate::DEFAULT_NUM_WANT;

/// The transfer counters a peer reports on every announce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Constructor)]
pub struct Progress {
    /// The total amount of bytes uploaded by this peer so far.
    pub uploaded: u64,
    /// The total amount of bytes downloaded by this peer so far.
    pub downloaded: u64,
    /// The number of bytes this peer still has to download.
    pub left: u64,
}

/// An announce request.
///
/// Use the [`AnnounceQueryBuilder`] to build one with the default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnounceQuery {
    pub info_hash: InfoHash,
    pub peer_id: PeerId,
    /// The port the peer is listening on.
    pub port: NonZeroU16,
    pub progress: Progress,
    /// The IP the peer wants the tracker to use instead of the request
    /// source address. `Some(0.0.0.0)` is sent as no IP at all, see
    /// [`AnnounceQuery::announced_ip`].
    pub ip: Option<Ipv4Addr>,
    /// Number of peers the client wants to receive. The tracker decides when
    /// it's absent.
    pub num_want: Option<u16>,
    /// `None` for the announces done at regular intervals.
    pub event: Option<AnnounceEvent>,
}

impl AnnounceQuery {
    /// The IP override that goes on the wire. The unspecified address
    /// `0.0.0.0` means no override in both tracker protocols.
    #[must_use]
    pub fn announced_ip(&self) -> Option<Ipv4Addr> {
        self.ip.filter(|ip| !ip.is_unspecified())
    }
}

#[derive(Debug)]
pub struct AnnounceQueryBuilder {
    query: AnnounceQuery,
}

impl AnnounceQueryBuilder {
    /// A regular announce with no transfer yet, asking for the
    /// [`DEFAULT_NUM_WANT`] peers.
    #[must_use]
    pub fn new(info_hash: InfoHash, peer_id: PeerId, port: NonZeroU16) -> Self {
        Self {
            query: AnnounceQuery {
                info_hash,
                peer_id,
                port,
                progress: Progress::default(),
                ip: None,
                num_want: Some(DEFAULT_NUM_WANT),
                event: None,
            },
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.query.progress = progress;
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: AnnounceEvent) -> Self {
        self.query.event = Some(event);
        self
    }

    /// The unspecified address `0.0.0.0` is the same as not sending any IP.
    #[must_use]
    pub fn with_ip(mut self, ip: Ipv4Addr) -> Self {
        self.query.ip = if ip.is_unspecified() { None } else { Some(ip) };
        self
    }

    #[must_use]
    pub fn with_num_want(mut self, num_want: u16) -> Self {
        self.query.num_want = Some(num_want);
        self
    }

    /// Leaves the number of peers up to the tracker.
    #[must_use]
    pub fn without_num_want(mut self) -> Self {
        self.query.num_want = None;
        self
    }

    #[must_use]
    pub fn build(self) -> AnnounceQuery {
        self.query
    }
}

/// The outcome of an announce.
///
/// A `Failure` is a legitimate answer from the tracker (for example, the
/// torrent is not registered in a private tracker), not a transport or
/// parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceInfo {
    Failure { reason: String },
    Success(AnnounceResponse),
}

impl AnnounceInfo {
    /// Converts the tracker failure into an error.
    ///
    /// # Errors
    ///
    /// Will return a [`TrackerFailure`] with the tracker reason if this is
    /// the `Failure` variant.
    pub fn into_response(self) -> Result<AnnounceResponse, TrackerFailure> {
        match self {
            AnnounceInfo::Failure { reason } => Err(TrackerFailure { reason }),
            AnnounceInfo::Success(response) => Ok(response),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, AnnounceInfo::Failure { .. })
    }
}

impl From<AnnounceResponse> for AnnounceInfo {
    fn from(response: AnnounceResponse) -> Self {
        AnnounceInfo::Success(response)
    }
}

/// The tracker answered the request with a failure reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("tracker failure: {reason}")]
pub struct TrackerFailure {
    pub reason: String,
}

/// Successful announce response.
///
/// Which optional fields are present depends on the tracker and the wire
/// format. The UDP tracker protocol, for instance, never carries the minimum
/// interval nor the warning message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnounceResponse {
    /// Number of seeders.
    pub complete: Option<u32>,
    /// Number of leechers.
    pub incomplete: Option<u32>,
    /// Seconds the client should wait between regular announces.
    pub interval: u32,
    /// Clients must not reannounce more frequently than this.
    pub min_interval: Option<u32>,
    pub peers: PeerList,
    /// Human-readable warning. The request succeeded anyway.
    pub warning: Option<String>,
    /// Opaque value the client should send back on the next announces.
    pub tracker_id: Option<Vec<u8>>,
}
