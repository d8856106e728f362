//! Tracker RPC.
//!
//! A [`TrackerRpc`] handle is bound to one tracker URI and one transport.
//! It serializes the queries with the codec of its transport, does the I/O
//! and decodes the responses with the same codec.
//!
//! There is one implementation per transport:
//!
//! - [`HttpTracker`](http::HttpTracker) for `http://` and `https://` trackers.
//! - [`UdpTracker`](udp::UdpTracker) for `udp://` trackers.
//!
//! [`AnyTracker`] picks the transport from the URI scheme:
//!
//! ```rust,no_run
//! use torrust_tracker_client::rpc::{AnyTracker, TrackerRpc};
//! use torrust_tracker_client_configuration::Configuration;
//! use torrust_tracker_client_primitives::InfoHash;
//!
//! # async fn run() -> Result<(), torrust_tracker_client::rpc::Error> {
//! let tracker = AnyTracker::connect("udp://tracker.example.com:6969/announce", &Configuration::default()).await?;
//!
//! let info = tracker.scrape_one(&InfoHash([0u8; 20])).await?;
//!
//! println!("{} seeders", info.complete);
//! # Ok(())
//! # }
//! ```
//!
//! Every call is an independent request. A handle can be shared by
//! concurrent callers and there is no ordering between their responses.
//! Nothing is retried: a failed call returns the error to its caller.
pub mod http;
pub mod udp;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use torrust_tracker_client_configuration::Configuration;
use torrust_tracker_client_primitives::{AnnounceInfo, AnnounceQuery, InfoHash, Scrape, ScrapeInfo, ScrapeQuery, TrackerFailure};
use url::Url;

use self::http::HttpTracker;
use self::udp::UdpTracker;
use crate::codec::DecodeError;

pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors returned by the tracker RPC.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// No transport for the URI scheme. Never retried.
    #[error("unsupported scheme `{scheme}` in tracker uri: {uri}")]
    UnsupportedScheme { scheme: String, uri: String },

    #[error("invalid tracker uri `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The round trip could not be completed. The caller can retry.
    #[error("request to tracker {uri} failed: {source}")]
    RequestFailed { uri: String, source: DynError },

    /// The tracker did not answer in time.
    #[error("tracker {uri} not responding after {timeout:?}")]
    NotResponding { uri: String, timeout: Duration },

    #[error("malformed response from tracker {uri}: {source}")]
    Decode { uri: String, source: DecodeError },

    /// The tracker answered with a well-formed failure.
    #[error("tracker failure: {reason}")]
    TrackerFailure { reason: String },

    /// The scrape response does not contain the requested info-hash.
    #[error("info-hash {info_hash} not found in the scrape response")]
    HashNotFound { info_hash: InfoHash },

    /// The announce URL does not allow deriving a scrape URL.
    #[error("tracker {uri} does not support scrape")]
    ScrapeUnsupported { uri: String },

    #[error("scrape request without info-hashes for tracker {uri}")]
    EmptyScrapeQuery { uri: String },

    #[error("unexpected response from tracker {uri}: {reason}")]
    UnexpectedResponse { uri: String, reason: String },
}

impl From<TrackerFailure> for Error {
    fn from(failure: TrackerFailure) -> Self {
        Self::TrackerFailure { reason: failure.reason }
    }
}

/// Announce and scrape against one tracker.
pub trait TrackerRpc: Sized + Send + Sync {
    /// Builds a handle for the tracker.
    ///
    /// # Errors
    ///
    /// Will return [`Error::UnsupportedScheme`] if this transport can not
    /// handle the URI scheme, or an error if the transport can not be
    /// established.
    fn connect(uri: &str, config: &Configuration) -> impl Future<Output = Result<Self, Error>> + Send;

    /// The URI the handle is bound to.
    fn uri(&self) -> &str;

    /// A tracker failure is a successful result: [`AnnounceInfo::Failure`].
    ///
    /// # Errors
    ///
    /// Will return an error if the tracker could not be reached, did not
    /// respond in time or returned malformed data.
    fn announce(&self, query: &AnnounceQuery) -> impl Future<Output = Result<AnnounceInfo, Error>> + Send;

    /// # Errors
    ///
    /// Will return an error if the tracker could not be reached, did not
    /// respond in time, returned malformed data or a failure.
    fn scrape(&self, query: &ScrapeQuery) -> impl Future<Output = Result<Scrape, Error>> + Send;

    /// Scrapes one torrent.
    ///
    /// # Errors
    ///
    /// Will return [`Error::HashNotFound`] if the tracker leaves the torrent
    /// out of an otherwise well-formed response, plus the [`TrackerRpc::scrape`]
    /// errors.
    fn scrape_one(&self, info_hash: &InfoHash) -> impl Future<Output = Result<ScrapeInfo, Error>> + Send {
        async move {
            let mut scrape = self.scrape(&ScrapeQuery::from(*info_hash)).await?;

            scrape.remove(info_hash).ok_or(Error::HashNotFound { info_hash: *info_hash })
        }
    }
}

/// A tracker of any of the supported transports.
#[derive(Debug)]
pub enum AnyTracker {
    Http(HttpTracker),
    Udp(UdpTracker),
}

impl TrackerRpc for AnyTracker {
    /// `http` and `https` trackers use the HTTP transport, `udp` trackers
    /// the UDP one.
    async fn connect(uri: &str, config: &Configuration) -> Result<Self, Error> {
        let url = parse_uri(uri)?;

        match url.scheme() {
            "http" | "https" => Ok(Self::Http(HttpTracker::connect(uri, config).await?)),
            "udp" => Ok(Self::Udp(UdpTracker::connect(uri, config).await?)),
            scheme => Err(Error::UnsupportedScheme {
                scheme: scheme.to_owned(),
                uri: uri.to_owned(),
            }),
        }
    }

    fn uri(&self) -> &str {
        match self {
            Self::Http(tracker) => tracker.uri(),
            Self::Udp(tracker) => tracker.uri(),
        }
    }

    async fn announce(&self, query: &AnnounceQuery) -> Result<AnnounceInfo, Error> {
        match self {
            Self::Http(tracker) => tracker.announce(query).await,
            Self::Udp(tracker) => tracker.announce(query).await,
        }
    }

    async fn scrape(&self, query: &ScrapeQuery) -> Result<Scrape, Error> {
        match self {
            Self::Http(tracker) => tracker.scrape(query).await,
            Self::Udp(tracker) => tracker.scrape(query).await,
        }
    }
}

/// # Errors
///
/// Will return [`Error::InvalidUri`] if the URI can not be parsed.
fn parse_uri(uri: &str) -> Result<Url, Error> {
    Url::parse(uri).map_err(|err| Error::InvalidUri {
        uri: uri.to_owned(),
        reason: err.to_string(),
    })
}

/// # Errors
///
/// Will return [`Error::UnsupportedScheme`] if the scheme is not one of the
/// `accepted` ones.
fn ensure_scheme(uri: &str, url: &Url, accepted: &[&str]) -> Result<(), Error> {
    if accepted.contains(&url.scheme()) {
        Ok(())
    } else {
        Err(Error::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
            uri: uri.to_owned(),
        })
    }
}
