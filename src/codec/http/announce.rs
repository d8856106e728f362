//! HTTP announce request and response.
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde_bencode::value::Value;
use torrust_tracker_client_primitives::{AnnounceEvent, AnnounceInfo, AnnounceQuery, AnnounceResponse, Peer, PeerId, PeerList};

use super::{bencode, percent_encode_byte_array};
use crate::codec::{compact, DecodeError};

/// The lowercase token for the `event` query parameter.
#[must_use]
pub fn event_token(event: AnnounceEvent) -> &'static str {
    match event {
        AnnounceEvent::Started => "started",
        AnnounceEvent::Stopped => "stopped",
        AnnounceEvent::Completed => "completed",
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Compact {
    Accepted,
    NotAccepted,
}

impl fmt::Display for Compact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compact::Accepted => write!(f, "1"),
            Compact::NotAccepted => write!(f, "0"),
        }
    }
}

/// It contains all the GET parameters of an announce request, already
/// encoded.
///
/// Sample announce URL with all the GET parameters (mandatory and optional):
///
/// ```text
/// http://127.0.0.1:7070/announce?
///     info_hash=%9C8B%22%13%E3%0B%FF%21%2B0%C3%60%D2o%9A%02%13d%22 (mandatory)
///     peer_id=-qB00000000000000000 (mandatory)
///     port=17548 (mandatory)
///     uploaded=0 (mandatory)
///     downloaded=0 (mandatory)
///     left=0 (mandatory)
///     ip=126.0.0.1
///     numwant=50
///     event=completed
///     compact=1
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QueryParams {
    pub info_hash: String,
    pub peer_id: String,
    pub port: String,
    pub uploaded: String,
    pub downloaded: String,
    pub left: String,
    pub ip: Option<String>,
    pub numwant: Option<String>,
    pub event: Option<String>,
    pub compact: Option<Compact>,
}

impl QueryParams {
    /// Asks the tracker for a compact (`compact=1`) or a dictionary
    /// (`compact=0`) peer list.
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = Some(if compact { Compact::Accepted } else { Compact::NotAccepted });
        self
    }
}

impl From<&AnnounceQuery> for QueryParams {
    fn from(query: &AnnounceQuery) -> Self {
        Self {
            info_hash: percent_encode_byte_array(&query.info_hash.bytes()),
            peer_id: percent_encode_byte_array(&query.peer_id.bytes()),
            port: query.port.to_string(),
            uploaded: query.progress.uploaded.to_string(),
            downloaded: query.progress.downloaded.to_string(),
            left: query.progress.left.to_string(),
            ip: query.announced_ip().map(|ip| ip.to_string()),
            numwant: query.num_want.as_ref().map(std::string::ToString::to_string),
            event: query.event.map(|event| event_token(event).to_owned()),
            compact: None,
        }
    }
}

/// It builds the URL query component. Absent optional parameters are left
/// out.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params: Vec<(&str, String)> = vec![
            ("info_hash", self.info_hash.clone()),
            ("peer_id", self.peer_id.clone()),
            ("port", self.port.clone()),
            ("uploaded", self.uploaded.clone()),
            ("downloaded", self.downloaded.clone()),
            ("left", self.left.clone()),
        ];

        if let Some(ip) = &self.ip {
            params.push(("ip", ip.clone()));
        }
        if let Some(numwant) = &self.numwant {
            params.push(("numwant", numwant.clone()));
        }
        if let Some(event) = &self.event {
            params.push(("event", event.clone()));
        }
        if let Some(compact) = &self.compact {
            params.push(("compact", compact.to_string()));
        }

        let query = params
            .iter()
            .map(|param| format!("{}={}", param.0, param.1))
            .collect::<Vec<String>>()
            .join("&");

        write!(f, "{query}")
    }
}

/// Encodes an announce query as a URL query string (without the leading `?`).
#[must_use]
pub fn encode_announce_query(query: &AnnounceQuery) -> String {
    QueryParams::from(query).to_string()
}

/// Decodes a bencoded announce response.
///
/// A dictionary with a `failure reason` is always a failure, whatever the
/// other keys are. Otherwise `interval` and `peers` are mandatory.
///
/// Sample compact response (JSON encoded for readability):
///
/// ```text
/// {
///   'complete': 7,
///   'incomplete': 3,
///   'interval': 1800,
///   'min interval': 900,
///   'peers': '\x7e\x00\x00\x01\x1a\xe1'
/// }
/// ```
///
/// # Errors
///
/// Will return a [`DecodeError`] if the body is not a bencoded dictionary,
/// a mandatory field is missing or a field has an unexpected type or value.
pub fn decode_announce_info(bytes: &[u8]) -> Result<AnnounceInfo, DecodeError> {
    let dict = bencode::parse_dict(bytes)?;

    if let Some(reason) = bencode::get(&dict, "failure reason") {
        return Ok(AnnounceInfo::Failure {
            reason: bencode::as_text("failure reason", reason)?,
        });
    }

    let interval = bencode::as_u32("interval", bencode::required(&dict, "interval")?)?;

    let mut peers = decode_peers(bencode::required(&dict, "peers")?)?;

    if let Some(peers6) = bencode::get(&dict, "peers6") {
        peers.extend(compact::decode_peers_v6("peers6", bencode::as_bytes("peers6", peers6)?)?);
    }

    let tracker_id = bencode::get(&dict, "tracker id")
        .map(|value| bencode::as_bytes("tracker id", value).map(<[u8]>::to_vec))
        .transpose()?;

    Ok(AnnounceInfo::Success(AnnounceResponse {
        complete: bencode::optional_u32(&dict, "complete")?,
        incomplete: bencode::optional_u32(&dict, "incomplete")?,
        interval,
        min_interval: bencode::optional_u32(&dict, "min interval")?,
        peers,
        warning: bencode::optional_text(&dict, "warning message")?,
        tracker_id,
    }))
}

fn decode_peers(value: &Value) -> Result<PeerList, DecodeError> {
    match value {
        Value::Bytes(bytes) => compact::decode_peers_v4("peers", bytes),
        Value::List(list) => list.iter().filter_map(|peer| decode_dictionary_peer(peer).transpose()).collect(),
        _ => Err(DecodeError::InvalidPeers),
    }
}

/// It parses one entry of the non compact peer list:
///
/// ```text
/// d2:ip9:126.0.0.17:peer id20:-qB000000000000000014:porti6881ee
/// ```
///
/// The `ip` can also be a DNS name. Those peers are skipped: a
/// [`PeerList`] only holds socket addresses.
fn decode_dictionary_peer(value: &Value) -> Result<Option<Peer>, DecodeError> {
    let dict = bencode::as_dict("peers", value)?;

    let host = bencode::as_text("ip", bencode::required(dict, "ip")?)?;
    let Ok(ip) = host.parse::<IpAddr>() else {
        tracing::debug!(%host, "skipping peer announced by host name");
        return Ok(None);
    };

    let port = bencode::as_u16("port", bencode::required(dict, "port")?)?;

    let peer = Peer::new(SocketAddr::new(ip, port));

    match bencode::get(dict, "peer id") {
        Some(value) => {
            let bytes = bencode::as_bytes("peer id", value)?;
            let peer_id = PeerId::from_slice(bytes).ok_or(DecodeError::InvalidPeerId { len: bytes.len() })?;
            Ok(Some(peer.with_id(peer_id)))
        }
        None => Ok(Some(peer)),
    }
}
