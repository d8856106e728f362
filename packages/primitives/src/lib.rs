//! Primitive types for the [Torrust Tracker Client](https://docs.rs/torrust-tracker-client).
//!
//! This package contains the message model used to talk to `BitTorrent`
//! trackers: the announce and scrape requests, their responses and the
//! peer list container. The same logical message has two physical
//! encodings (bencoded HTTP and binary UDP), so these types carry no
//! serialization rules. The codecs live in the client crate.
//!
//! All values are plain, immutable data. They are built fresh for every
//! request or response and owned by whoever built or received them.
use std::ops::RangeInclusive;

pub mod announce;
pub mod announce_event;
pub mod info_hash;
pub mod peer;
pub mod scrape;

pub use announce::{AnnounceInfo, AnnounceQuery, AnnounceQueryBuilder, AnnounceResponse, Progress, TrackerFailure};
pub use announce_event::AnnounceEvent;
pub use info_hash::InfoHash;
pub use peer::{Peer, PeerId, PeerList};
pub use scrape::{Scrape, ScrapeInfo, ScrapeQuery};

/// Number of peers requested when the caller does not choose one.
///
/// Above 25 new peers rarely help, but trackers commonly cap at 50 and
/// asking for that many gives the peer manager some room to choose.
pub const DEFAULT_NUM_WANT: u16 = 50;

/// The ports conventionally used by `BitTorrent` clients to listen for
/// incoming peer connections.
pub const DEFAULT_PORTS: RangeInclusive<u16> = 6881..=6889;
