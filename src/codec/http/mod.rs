//! HTTP tracker encoding.
//!
//! Requests are `GET` query strings. Responses are bencoded dictionaries.
//!
//! - Announce: [BEP 3](https://www.bittorrent.org/beps/bep_0003.html),
//!   [BEP 23](https://www.bittorrent.org/beps/bep_0023.html) (compact peers)
//!   and [BEP 7](https://www.bittorrent.org/beps/bep_0007.html) (`peers6`).
//! - Scrape: [BEP 48](https://www.bittorrent.org/beps/bep_0048.html).
pub mod announce;
mod bencode;
pub mod scrape;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

pub use self::announce::{decode_announce_info, encode_announce_query, event_token, QueryParams};
pub use self::scrape::{decode_scrape, encode_scrape_query, ScrapeReply};

/// Every byte is escaped except the RFC 3986 unreserved characters.
const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes raw bytes, like the info-hash or the peer ID.
///
/// It can not use the `reqwest` query builder because it only accepts UTF-8
/// strings. More info on this issue:
///
/// <https://github.com/seanmonstar/reqwest/issues/1613>
#[must_use]
pub fn percent_encode_byte_array(bytes: &[u8]) -> String {
    percent_encoding::percent_encode(bytes, URL_ENCODE_SET).to_string()
}
