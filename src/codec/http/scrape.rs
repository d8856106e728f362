//! HTTP scrape request and response.
//!
//! <https://www.bittorrent.org/beps/bep_0048.html>
use torrust_tracker_client_primitives::{InfoHash, Scrape, ScrapeInfo, ScrapeQuery};

use super::bencode::{self, Dict};
use super::percent_encode_byte_array;
use crate::codec::DecodeError;

/// A decoded scrape response.
///
/// The scrape message model has no failure variant, so the tracker failure
/// is kept apart here and the transport turns it into an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeReply {
    Failure { reason: String },
    Files(Scrape),
}

/// Encodes a scrape query as a URL query string: one `info_hash` param per
/// torrent, in request order.
///
/// ```text
/// info_hash=%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0&info_hash=%99%FE...
/// ```
///
/// An empty query encodes to an empty string.
#[must_use]
pub fn encode_scrape_query(query: &ScrapeQuery) -> String {
    query
        .info_hashes()
        .iter()
        .map(|info_hash| format!("info_hash={}", percent_encode_byte_array(&info_hash.bytes())))
        .collect::<Vec<String>>()
        .join("&")
}

/// It parses a bencoded scrape response.
///
/// For example:
///
/// ```text
/// d5:filesd20:xxxxxxxxxxxxxxxxxxxxd8:completei11e10:downloadedi13772e10:incompletei19e
/// 20:yyyyyyyyyyyyyyyyyyyyd8:completei21e10:downloadedi206e10:incompletei20eee
/// ```
///
/// Response (JSON encoded for readability):
///
/// ```text
/// {
///   'files': {
///     'xxxxxxxxxxxxxxxxxxxx': {'complete': 11, 'downloaded': 13772, 'incomplete': 19},
///     'yyyyyyyyyyyyyyyyyyyy': {'complete': 21, 'downloaded': 206, 'incomplete': 20}
///   }
/// }
/// ```
///
/// Trackers that leave out the `files` wrapper and put the info-hashes at the
/// top level are accepted too.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the body is not a bencoded dictionary,
/// a key is not a 20-byte info-hash or a torrent lacks one of `complete`,
/// `downloaded` and `incomplete`.
pub fn decode_scrape(bytes: &[u8]) -> Result<ScrapeReply, DecodeError> {
    let dict = bencode::parse_dict(bytes)?;

    if let Some(reason) = bencode::get(&dict, "failure reason") {
        return Ok(ScrapeReply::Failure {
            reason: bencode::as_text("failure reason", reason)?,
        });
    }

    let files = match bencode::get(&dict, "files") {
        Some(files) => bencode::as_dict("files", files)?,
        None => &dict,
    };

    let mut scrape = Scrape::default();

    for (info_hash_bytes, file_value) in files {
        let info_hash =
            InfoHash::try_from(info_hash_bytes.as_slice()).map_err(|_| DecodeError::InvalidInfoHash {
                len: info_hash_bytes.len(),
            })?;

        let file = decode_file(bencode::as_dict("files", file_value)?)?;

        scrape.insert(info_hash, file);
    }

    Ok(ScrapeReply::Files(scrape))
}

/// It parses the statistics of one torrent:
///
/// ```text
/// d8:completei11e10:downloadedi13772e10:incompletei19e4:name8:ubuntu24e
/// ```
///
/// Unknown keys are ignored.
fn decode_file(dict: &Dict) -> Result<ScrapeInfo, DecodeError> {
    Ok(ScrapeInfo {
        complete: bencode::as_u32("complete", bencode::required(dict, "complete")?)?,
        downloaded: bencode::as_u32("downloaded", bencode::required(dict, "downloaded")?)?,
        incomplete: bencode::as_u32("incomplete", bencode::required(dict, "incomplete")?)?,
        name: bencode::optional_text(dict, "name")?,
    })
}
