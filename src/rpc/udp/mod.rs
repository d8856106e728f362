//! UDP tracker transport.
//!
//! [BEP 15](https://www.bittorrent.org/beps/bep_0015.html). Every request
//! opens its own socket and does its own connect handshake before the
//! announce or scrape exchange. Concurrent callers sharing a handle never
//! share a socket, a connection id or a transaction id.
//!
//! The whole exchange, handshake included, must complete within the
//! configured timeout. Nothing is retransmitted.
pub mod frame;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time;
use torrust_tracker_client_configuration::Configuration;
use torrust_tracker_client_primitives::{AnnounceInfo, AnnounceQuery, Scrape, ScrapeQuery};
use tracing::{debug, trace, warn};
use url::{Host, Url};

use self::frame::{Action, MAX_SCRAPE_TORRENTS, RECEIVE_BUFFER_SIZE};
use super::{ensure_scheme, parse_uri, Error, TrackerRpc};
use crate::codec::udp::{decode_announce_info, decode_announce_info_v6, decode_failure, decode_scrape, encode_announce_query, encode_scrape_query};
use crate::codec::DecodeError;

/// What the tracker answered to a request.
enum Reply {
    Body(Vec<u8>),
    Failure(Vec<u8>),
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct UdpTracker {
    uri: String,
    remote_addr: SocketAddr,
    bind_address: SocketAddr,
    timeout: Duration,
}

impl UdpTracker {
    /// The resolved tracker address.
    #[must_use]
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Sends one request with a fresh socket and connection id.
    async fn request(&self, action: Action, body: &[u8]) -> Result<Reply, Error> {
        match time::timeout(self.timeout, self.exchange(action, body)).await {
            Ok(reply) => reply,
            Err(_) => {
                warn!(target: "UDP tracker client", "tracker {} not responding to {action} after {:?}", self.uri, self.timeout);

                Err(Error::NotResponding {
                    uri: self.uri.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn exchange(&self, action: Action, body: &[u8]) -> Result<Reply, Error> {
        let socket = self.open_socket().await?;

        let connection_id = self.handshake(&socket).await?;

        let transaction_id = rand::random::<i32>();

        self.send(&socket, &frame::encode_request(connection_id, action, transaction_id, body))
            .await?;

        let mut buffer = vec![0u8; RECEIVE_BUFFER_SIZE];

        let response = self.receive(&socket, transaction_id, &mut buffer).await?;

        if response.action == action {
            Ok(Reply::Body(response.body.to_vec()))
        } else if response.action == Action::Error {
            Ok(Reply::Failure(response.body.to_vec()))
        } else {
            Err(self.unexpected_response(format!("expected {action} response, got {}", response.action)))
        }
    }

    async fn open_socket(&self) -> Result<UdpSocket, Error> {
        let socket = UdpSocket::bind(self.bind_address)
            .await
            .map_err(|err| self.io_error(err))?;

        socket.connect(self.remote_addr).await.map_err(|err| self.io_error(err))?;

        Ok(socket)
    }

    /// Returns the connection id granted by the tracker.
    async fn handshake(&self, socket: &UdpSocket) -> Result<i64, Error> {
        let transaction_id = rand::random::<i32>();

        self.send(socket, &frame::encode_connect_request(transaction_id)).await?;

        let mut buffer = vec![0u8; RECEIVE_BUFFER_SIZE];

        let response = self.receive(socket, transaction_id, &mut buffer).await?;

        match response.action {
            Action::Connect => frame::decode_connection_id(response.body).map_err(|err| self.decode_error(err)),
            Action::Error => Err(Error::TrackerFailure {
                reason: String::from_utf8_lossy(response.body).into_owned(),
            }),
            action => Err(self.unexpected_response(format!("expected connect response, got {action}"))),
        }
    }

    async fn send(&self, socket: &UdpSocket, bytes: &[u8]) -> Result<(), Error> {
        trace!(target: "UDP tracker client", "sending {} bytes to {}", bytes.len(), self.remote_addr);

        socket.send(bytes).await.map_err(|err| self.io_error(err))?;

        Ok(())
    }

    async fn receive<'a>(
        &self,
        socket: &UdpSocket,
        transaction_id: i32,
        buffer: &'a mut [u8],
    ) -> Result<frame::Response<'a>, Error> {
        let size = socket.recv(buffer).await.map_err(|err| self.io_error(err))?;

        trace!(target: "UDP tracker client", "{size} bytes received from {}", self.remote_addr);

        let response = frame::decode_response(&buffer[..size]).map_err(|err| self.decode_error(err))?;

        if response.transaction_id != transaction_id {
            return Err(self.unexpected_response(format!(
                "transaction id {} does not match {transaction_id}",
                response.transaction_id
            )));
        }

        Ok(response)
    }

    fn io_error(&self, err: std::io::Error) -> Error {
        warn!(target: "UDP tracker client", "request to {} failed: {err}", self.uri);

        Error::RequestFailed {
            uri: self.uri.clone(),
            source: Arc::new(err),
        }
    }

    fn decode_error(&self, source: DecodeError) -> Error {
        warn!(target: "UDP tracker client", "malformed response from {}: {source}", self.uri);

        Error::Decode {
            uri: self.uri.clone(),
            source,
        }
    }

    fn unexpected_response(&self, reason: String) -> Error {
        warn!(target: "UDP tracker client", "unexpected response from {}: {reason}", self.uri);

        Error::UnexpectedResponse {
            uri: self.uri.clone(),
            reason,
        }
    }
}

impl TrackerRpc for UdpTracker {
    /// Resolves the tracker host and does one connect handshake to check the
    /// tracker answers.
    async fn connect(uri: &str, config: &Configuration) -> Result<Self, Error> {
        let url = parse_uri(uri)?;

        ensure_scheme(uri, &url, &["udp"])?;

        let remote_addr = resolve(uri, &url).await?;

        let tracker = Self {
            uri: uri.to_owned(),
            remote_addr,
            bind_address: config.udp.bind_address_for(&remote_addr),
            timeout: config.udp.timeout,
        };

        let handshake = async {
            let socket = tracker.open_socket().await?;
            tracker.handshake(&socket).await
        };

        match time::timeout(tracker.timeout, handshake).await {
            Ok(connection_id) => {
                connection_id?;
            }
            Err(_) => {
                warn!(target: "UDP tracker client", "tracker {uri} not responding to connect after {:?}", tracker.timeout);

                return Err(Error::NotResponding {
                    uri: uri.to_owned(),
                    timeout: tracker.timeout,
                });
            }
        }

        debug!(target: "UDP tracker client", "connected to {uri} ({remote_addr})");

        Ok(tracker)
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    async fn announce(&self, query: &AnnounceQuery) -> Result<AnnounceInfo, Error> {
        debug!(target: "UDP tracker client", "announce {} to {}", query.info_hash, self.uri);

        match self.request(Action::Announce, &encode_announce_query(query)).await? {
            Reply::Body(body) => {
                let info = if self.remote_addr.is_ipv6() {
                    decode_announce_info_v6(&body)
                } else {
                    decode_announce_info(&body)
                };

                info.map_err(|err| self.decode_error(err))
            }
            Reply::Failure(message) => {
                let info = decode_failure(&message);

                debug!(target: "UDP tracker client", "tracker {} announce failure: {info:?}", self.uri);

                Ok(info)
            }
        }
    }

    /// Torrents are scraped in batches of [`MAX_SCRAPE_TORRENTS`], one
    /// request per batch.
    async fn scrape(&self, query: &ScrapeQuery) -> Result<Scrape, Error> {
        if query.is_empty() {
            return Err(Error::EmptyScrapeQuery { uri: self.uri.clone() });
        }

        let mut scrape = Scrape::default();

        for info_hashes in query.info_hashes().chunks(MAX_SCRAPE_TORRENTS) {
            debug!(target: "UDP tracker client", "scrape {} torrents from {}", info_hashes.len(), self.uri);

            let batch = ScrapeQuery::new(info_hashes.to_vec());

            match self.request(Action::Scrape, &encode_scrape_query(&batch)).await? {
                Reply::Body(body) => {
                    scrape.extend(decode_scrape(info_hashes, &body).map_err(|err| self.decode_error(err))?);
                }
                Reply::Failure(message) => {
                    let reason = String::from_utf8_lossy(&message).into_owned();

                    debug!(target: "UDP tracker client", "tracker {} scrape failure: {reason}", self.uri);

                    return Err(Error::TrackerFailure { reason });
                }
            }
        }

        Ok(scrape)
    }
}

/// Resolves the tracker host. A domain resolving to several addresses uses
/// the first one.
async fn resolve(uri: &str, url: &Url) -> Result<SocketAddr, Error> {
    let Some(port) = url.port() else {
        return Err(Error::InvalidUri {
            uri: uri.to_owned(),
            reason: "missing port".to_owned(),
        });
    };

    match url.host() {
        Some(Host::Ipv4(ip)) => Ok(SocketAddr::new(ip.into(), port)),
        Some(Host::Ipv6(ip)) => Ok(SocketAddr::new(ip.into(), port)),
        Some(Host::Domain(domain)) => {
            let mut addrs = tokio::net::lookup_host((domain, port)).await.map_err(|err| Error::RequestFailed {
                uri: uri.to_owned(),
                source: Arc::new(err),
            })?;

            addrs.next().ok_or_else(|| Error::RequestFailed {
                uri: uri.to_owned(),
                source: Arc::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no address found for {domain}"),
                )),
            })
        }
        None => Err(Error::InvalidUri {
            uri: uri.to_owned(),
            reason: "missing host".to_owned(),
        }),
    }
}
