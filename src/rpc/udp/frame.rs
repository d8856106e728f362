//! UDP tracker packet framing.
//!
//! Every request starts with the connection id, the action and a
//! transaction id chosen by the client. Every response starts with the
//! action and the same transaction id.
//!
//! ```text
//! Connect request          Request header           Response header
//! Offset  Size  Name       Offset  Size  Name       Offset  Size  Name
//! 0       8     protocol   0       8     conn. id   0       4     action
//! 8       4     action     8       4     action     4       4     transaction id
//! 12      4     trans. id  12      4     trans. id
//! ```
//!
//! The connect response body is the 8-byte connection id. The error
//! response body is the failure message.
use std::fmt;

use zerocopy::network_endian::{I32, I64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::codec::DecodeError;

/// A magic 64-bit integer constant defined in the protocol that is used to
/// identify the protocol.
pub const PROTOCOL_ID: i64 = 0x0417_2710_1980;

/// The maximum number of bytes in a request packet. It fits a scrape
/// request for [`MAX_SCRAPE_TORRENTS`].
pub const MAX_PACKET_SIZE: usize = 1496;

/// Maximum number of torrents in one scrape request.
pub const MAX_SCRAPE_TORRENTS: usize = 74;

/// Size of the receive buffer: the largest UDP payload over IPv4.
pub const RECEIVE_BUFFER_SIZE: usize = 65_507;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    Announce,
    Scrape,
    Error,
}

impl Action {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Action::Connect => 0,
            Action::Announce => 1,
            Action::Scrape => 2,
            Action::Error => 3,
        }
    }

    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Action::Connect),
            1 => Some(Action::Announce),
            2 => Some(Action::Scrape),
            3 => Some(Action::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Action::Connect => "connect",
            Action::Announce => "announce",
            Action::Scrape => "scrape",
            Action::Error => "error",
        };

        f.write_str(action)
    }
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ConnectRequestBytes {
    pub protocol_id: I64,
    pub action: I32,
    pub transaction_id: I32,
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RequestHeaderBytes {
    pub connection_id: I64,
    pub action: I32,
    pub transaction_id: I32,
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ResponseHeaderBytes {
    pub action: I32,
    pub transaction_id: I32,
}

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ConnectResponseBytes {
    pub connection_id: I64,
}

pub const REQUEST_HEADER_LEN: usize = std::mem::size_of::<RequestHeaderBytes>();
pub const RESPONSE_HEADER_LEN: usize = std::mem::size_of::<ResponseHeaderBytes>();

/// A request as seen by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<'a> {
    Connect {
        transaction_id: i32,
    },
    Other {
        connection_id: i64,
        action: Action,
        transaction_id: i32,
        body: &'a [u8],
    },
}

/// A response as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<'a> {
    pub action: Action,
    pub transaction_id: i32,
    pub body: &'a [u8],
}

#[must_use]
pub fn encode_connect_request(transaction_id: i32) -> Vec<u8> {
    ConnectRequestBytes {
        protocol_id: I64::new(PROTOCOL_ID),
        action: I32::new(Action::Connect.code()),
        transaction_id: I32::new(transaction_id),
    }
    .as_bytes()
    .to_vec()
}

#[must_use]
pub fn encode_request(connection_id: i64, action: Action, transaction_id: i32, body: &[u8]) -> Vec<u8> {
    let header = RequestHeaderBytes {
        connection_id: I64::new(connection_id),
        action: I32::new(action.code()),
        transaction_id: I32::new(transaction_id),
    };

    [header.as_bytes(), body].concat()
}

/// Decodes a request. A request whose first 8 bytes are the protocol id and
/// whose action is `connect` is a connect request.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the packet is shorter than the header or
/// the action is unknown.
pub fn decode_request(bytes: &[u8]) -> Result<Request<'_>, DecodeError> {
    let header = RequestHeaderBytes::read_from_prefix(bytes).ok_or(DecodeError::InvalidLength {
        record: "request header",
        expected: REQUEST_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let action = decode_action(header.action.get())?;

    if action == Action::Connect && header.connection_id.get() == PROTOCOL_ID {
        return Ok(Request::Connect {
            transaction_id: header.transaction_id.get(),
        });
    }

    Ok(Request::Other {
        connection_id: header.connection_id.get(),
        action,
        transaction_id: header.transaction_id.get(),
        body: &bytes[REQUEST_HEADER_LEN..],
    })
}

#[must_use]
pub fn encode_response(action: Action, transaction_id: i32, body: &[u8]) -> Vec<u8> {
    let header = ResponseHeaderBytes {
        action: I32::new(action.code()),
        transaction_id: I32::new(transaction_id),
    };

    [header.as_bytes(), body].concat()
}

#[must_use]
pub fn encode_connect_response(transaction_id: i32, connection_id: i64) -> Vec<u8> {
    let body = ConnectResponseBytes {
        connection_id: I64::new(connection_id),
    };

    encode_response(Action::Connect, transaction_id, body.as_bytes())
}

/// # Errors
///
/// Will return a [`DecodeError`] if the packet is shorter than the header or
/// the action is unknown.
pub fn decode_response(bytes: &[u8]) -> Result<Response<'_>, DecodeError> {
    let header = ResponseHeaderBytes::read_from_prefix(bytes).ok_or(DecodeError::InvalidLength {
        record: "response header",
        expected: RESPONSE_HEADER_LEN,
        actual: bytes.len(),
    })?;

    Ok(Response {
        action: decode_action(header.action.get())?,
        transaction_id: header.transaction_id.get(),
        body: &bytes[RESPONSE_HEADER_LEN..],
    })
}

/// # Errors
///
/// Will return a [`DecodeError::InvalidLength`] if the body is not exactly
/// 8 bytes long.
pub fn decode_connection_id(body: &[u8]) -> Result<i64, DecodeError> {
    ConnectResponseBytes::read_from(body)
        .map(|record| record.connection_id.get())
        .ok_or(DecodeError::InvalidLength {
            record: "connect response",
            expected: std::mem::size_of::<ConnectResponseBytes>(),
            actual: body.len(),
        })
}

fn decode_action(code: i32) -> Result<Action, DecodeError> {
    Action::from_code(code).ok_or(DecodeError::IntegerOutOfRange {
        field: "action",
        value: i64::from(code),
    })
}
