//! **Torrust Tracker Client** is a library to talk to `BitTorrent` trackers.
//!
//! It implements the two operations a `BitTorrent` client needs from a tracker:
//!
//! - `announce`: tell the tracker about the client and get a list of peers
//!   of the swarm.
//! - `scrape`: get the swarm statistics of one or more torrents.
//!
//! Over the two tracker protocols in use:
//!
//! - [BEP 3. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html),
//!   HTTP trackers, with the [BEP 23](https://www.bittorrent.org/beps/bep_0023.html) compact peer lists
//!   and the [BEP 7](https://www.bittorrent.org/beps/bep_0007.html) IPv6 peers.
//! - [BEP 15. UDP Tracker Protocol for `BitTorrent`](https://www.bittorrent.org/beps/bep_0015.html).
//!
//! # Table of contents
//!
//! - [Components](#components)
//! - [Configuration](#configuration)
//! - [Usage](#usage)
//!
//! # Components
//!
//! - [`codec`]: the wire formats. One sub-module per transport, plus the
//!   compact peer records shared by both.
//! - [`rpc`]: the [`TrackerRpc`](rpc::TrackerRpc) handles. One per transport,
//!   plus [`AnyTracker`](rpc::AnyTracker) which picks one from the URI scheme.
//! - [`block`]: piece and block arithmetic for the peer-wire layer.
//! - [`bootstrap`]: logging setup.
//!
//! The message model (`AnnounceQuery`, `AnnounceInfo`, `ScrapeQuery`,
//! `Scrape`...) lives in the `torrust-tracker-client-primitives` package. It
//! does not depend on any transport.
//!
//! # Configuration
//!
//! The configuration is loaded with the `torrust-tracker-client-configuration`
//! package from a TOML file or string, with environment overrides:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [http]
//! timeout = 15
//! user_agent = "torrust-tracker-client"
//! compact = true
//! empty_scrape = "scrape_all"
//! max_redirects = 3
//!
//! [udp]
//! timeout = 15
//! bind_ip = "0.0.0.0"
//! bind_ip_v6 = "::"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::num::NonZeroU16;
//!
//! use torrust_tracker_client::bootstrap;
//! use torrust_tracker_client::rpc::{AnyTracker, TrackerRpc};
//! use torrust_tracker_client_configuration::Configuration;
//! use torrust_tracker_client_primitives::{AnnounceEvent, AnnounceInfo, AnnounceQueryBuilder, InfoHash, PeerId};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration::default();
//!
//! bootstrap::logging::setup(&config);
//!
//! let tracker = AnyTracker::connect("http://tracker.example.com/announce", &config).await?;
//!
//! let port = NonZeroU16::new(6881).ok_or("the port can not be zero")?;
//!
//! let query = AnnounceQueryBuilder::new(InfoHash([0u8; 20]), PeerId(*b"-qB00000000000000000"), port)
//!     .with_event(AnnounceEvent::Started)
//!     .build();
//!
//! match tracker.announce(&query).await? {
//!     AnnounceInfo::Success(announce) => println!("{} peers", announce.peers.len()),
//!     AnnounceInfo::Failure { reason } => println!("tracker failure: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
pub mod block;
pub mod bootstrap;
pub mod codec;
pub mod rpc;
