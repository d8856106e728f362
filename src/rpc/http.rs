//! HTTP tracker transport.
//!
//! Announce and scrape are `GET` requests. The query string is appended to
//! the announce or scrape URL, with `&` when the URL already has a query
//! (for example, a private tracker passkey).
//!
//! The scrape URL is derived from the announce URL as described in
//! [BEP 48](https://www.bittorrent.org/beps/bep_0048.html): the last path
//! segment must start with `announce`, which is replaced by `scrape`.
//!
//! ```text
//! http://example.com/announce          -> http://example.com/scrape
//! http://example.com/x/announce        -> http://example.com/x/scrape
//! http://example.com/announce.php      -> http://example.com/scrape.php
//! http://example.com/a                 -> (scrape not supported)
//! http://example.com/announce?x2%0644  -> http://example.com/scrape?x2%0644
//! ```
use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::StatusCode;
use torrust_tracker_client_configuration::{Configuration, EmptyScrape};
use torrust_tracker_client_primitives::{AnnounceInfo, AnnounceQuery, Scrape, ScrapeQuery};
use tracing::{debug, warn};
use url::Url;

use super::{ensure_scheme, parse_uri, Error, TrackerRpc};
use crate::codec::http::{decode_announce_info, decode_scrape, encode_scrape_query, QueryParams, ScrapeReply};

#[derive(thiserror::Error, Debug)]
#[error("unexpected HTTP status {status}")]
pub struct UnexpectedStatus {
    pub status: StatusCode,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct HttpTracker {
    uri: String,
    announce_url: Url,
    scrape_url: Option<Url>,
    client: reqwest::Client,
    timeout: Duration,
    compact: bool,
    empty_scrape: EmptyScrape,
}

impl HttpTracker {
    /// The scrape URL, if the tracker supports scrape.
    #[must_use]
    pub fn scrape_url(&self) -> Option<&Url> {
        self.scrape_url.as_ref()
    }

    async fn get(&self, url: String) -> Result<Vec<u8>, Error> {
        debug!(target: "HTTP tracker client", "GET {url}");

        let response = self.client.get(url).send().await.map_err(|err| self.transport_error(err))?;

        let status = response.status();

        if !status.is_success() {
            warn!(target: "HTTP tracker client", "tracker {} answered with status {status}", self.uri);

            return Err(Error::RequestFailed {
                uri: self.uri.clone(),
                source: Arc::new(UnexpectedStatus { status }),
            });
        }

        let body = response.bytes().await.map_err(|err| self.transport_error(err))?;

        debug!(target: "HTTP tracker client", "received {} bytes from {}", body.len(), self.uri);

        Ok(body.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        warn!(target: "HTTP tracker client", "request to {} failed: {err}", self.uri);

        if err.is_timeout() {
            Error::NotResponding {
                uri: self.uri.clone(),
                timeout: self.timeout,
            }
        } else {
            Error::RequestFailed {
                uri: self.uri.clone(),
                source: Arc::new(err),
            }
        }
    }

    fn decode_error(&self, source: crate::codec::DecodeError) -> Error {
        warn!(target: "HTTP tracker client", "malformed response from {}: {source}", self.uri);

        Error::Decode {
            uri: self.uri.clone(),
            source,
        }
    }
}

impl TrackerRpc for HttpTracker {
    /// No request is sent. It only validates the URI and builds the HTTP
    /// client.
    async fn connect(uri: &str, config: &Configuration) -> Result<Self, Error> {
        let announce_url = parse_uri(uri)?;

        ensure_scheme(uri, &announce_url, &["http", "https"])?;

        let redirect = if config.http.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.http.max_redirects)
        };

        let client = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .user_agent(config.http.user_agent.clone())
            .redirect(redirect)
            .build()
            .map_err(|err| Error::RequestFailed {
                uri: uri.to_owned(),
                source: Arc::new(err),
            })?;

        let scrape_url = scrape_url(&announce_url);

        debug!(target: "HTTP tracker client", "connected to {uri}, scrape url: {scrape_url:?}");

        Ok(Self {
            uri: uri.to_owned(),
            announce_url,
            scrape_url,
            client,
            timeout: config.http.timeout,
            compact: config.http.compact,
            empty_scrape: config.http.empty_scrape,
        })
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    async fn announce(&self, query: &AnnounceQuery) -> Result<AnnounceInfo, Error> {
        let params = QueryParams::from(query).with_compact(self.compact);

        let body = self.get(append_query(&self.announce_url, &params.to_string())).await?;

        let info = decode_announce_info(&body).map_err(|err| self.decode_error(err))?;

        if let AnnounceInfo::Failure { reason } = &info {
            debug!(target: "HTTP tracker client", "tracker {} announce failure: {reason}", self.uri);
        }

        Ok(info)
    }

    async fn scrape(&self, query: &ScrapeQuery) -> Result<Scrape, Error> {
        let Some(scrape_url) = &self.scrape_url else {
            return Err(Error::ScrapeUnsupported { uri: self.uri.clone() });
        };

        if query.is_empty() && self.empty_scrape == EmptyScrape::Reject {
            return Err(Error::EmptyScrapeQuery { uri: self.uri.clone() });
        }

        let body = self.get(append_query(scrape_url, &encode_scrape_query(query))).await?;

        match decode_scrape(&body).map_err(|err| self.decode_error(err))? {
            ScrapeReply::Files(scrape) => Ok(scrape),
            ScrapeReply::Failure { reason } => {
                debug!(target: "HTTP tracker client", "tracker {} scrape failure: {reason}", self.uri);

                Err(Error::TrackerFailure { reason })
            }
        }
    }
}

/// Derives the scrape URL from the announce URL.
#[must_use]
pub fn scrape_url(announce_url: &Url) -> Option<Url> {
    let path = announce_url.path();

    let last_slash = path.rfind('/')?;

    let rest = path[last_slash + 1..].strip_prefix("announce")?;

    let mut scrape_url = announce_url.clone();
    scrape_url.set_path(&format!("{}scrape{rest}", &path[..=last_slash]));

    Some(scrape_url)
}

/// Appends an already encoded query string. The fragment, if any, is not
/// sent.
///
/// `Url::set_query` can not be used because it would escape the percent
/// signs of the bytes already encoded.
fn append_query(url: &Url, query: &str) -> String {
    let mut url = url.clone();
    url.set_fragment(None);

    if query.is_empty() {
        return url.to_string();
    }

    let separator = match url.query() {
        Some(existing) if !existing.is_empty() => "&",
        Some(_) => "",
        None => "?",
    };

    format!("{url}{separator}{query}")
}
