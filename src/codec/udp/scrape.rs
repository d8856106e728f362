//! UDP scrape request and response bodies.
//!
//! The request body is the concatenation of the 20-byte info-hashes. The
//! response body has one 12-byte record per requested info-hash, in request
//! order:
//!
//! ```text
//! Offset      Size    Name
//! 0 + 12 * n  4       seeders
//! 4 + 12 * n  4       completed
//! 8 + 12 * n  4       leechers
//! ```
use torrust_tracker_client_primitives::info_hash::INFO_HASH_BYTES_LEN;
use torrust_tracker_client_primitives::{InfoHash, Scrape, ScrapeInfo, ScrapeQuery};
use zerocopy::network_endian::U32;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::codec::DecodeError;

#[derive(FromZeroes, FromBytes, AsBytes, Unaligned, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScrapeInfoBytes {
    pub seeders: U32,
    pub completed: U32,
    pub leechers: U32,
}

pub const SCRAPE_INFO_LEN: usize = std::mem::size_of::<ScrapeInfoBytes>();

impl From<&ScrapeInfo> for ScrapeInfoBytes {
    fn from(info: &ScrapeInfo) -> Self {
        Self {
            seeders: U32::new(info.complete),
            completed: U32::new(info.downloaded),
            leechers: U32::new(info.incomplete),
        }
    }
}

impl From<ScrapeInfoBytes> for ScrapeInfo {
    fn from(record: ScrapeInfoBytes) -> Self {
        Self {
            complete: record.seeders.get(),
            downloaded: record.completed.get(),
            incomplete: record.leechers.get(),
            name: None,
        }
    }
}

/// Encodes one scrape record. The name is not part of the binary format.
#[must_use]
pub fn encode_scrape_info(info: &ScrapeInfo) -> Vec<u8> {
    ScrapeInfoBytes::from(info).as_bytes().to_vec()
}

/// Decodes one scrape record. The name is always absent.
///
/// # Errors
///
/// Will return a [`DecodeError::InvalidLength`] if the record is not exactly
/// 12 bytes long.
pub fn decode_scrape_info(bytes: &[u8]) -> Result<ScrapeInfo, DecodeError> {
    ScrapeInfoBytes::read_from(bytes)
        .map(ScrapeInfo::from)
        .ok_or(DecodeError::InvalidLength {
            record: "scrape info",
            expected: SCRAPE_INFO_LEN,
            actual: bytes.len(),
        })
}

/// Encodes the body of a scrape request.
#[must_use]
pub fn encode_scrape_query(query: &ScrapeQuery) -> Vec<u8> {
    query.info_hashes().iter().flat_map(InfoHash::bytes).collect()
}

/// Decodes the body of a scrape request.
///
/// # Errors
///
/// Will return a [`DecodeError::MisalignedRecords`] if the length is not a
/// multiple of 20.
pub fn decode_scrape_query(bytes: &[u8]) -> Result<ScrapeQuery, DecodeError> {
    if bytes.len() % INFO_HASH_BYTES_LEN != 0 {
        return Err(DecodeError::MisalignedRecords {
            record: "info-hashes",
            size: INFO_HASH_BYTES_LEN,
            len: bytes.len(),
        });
    }

    bytes
        .chunks_exact(INFO_HASH_BYTES_LEN)
        .map(|chunk| InfoHash::try_from(chunk).map_err(|_| DecodeError::InvalidInfoHash { len: chunk.len() }))
        .collect()
}

/// Encodes the body of a scrape response with one record per requested
/// info-hash. Torrents missing in the `scrape` get a zeroed record.
#[must_use]
pub fn encode_scrape(query: &ScrapeQuery, scrape: &Scrape) -> Vec<u8> {
    let zeroed = ScrapeInfo::zeroed();

    query
        .info_hashes()
        .iter()
        .flat_map(|info_hash| encode_scrape_info(scrape.get(info_hash).unwrap_or(&zeroed)))
        .collect()
}

/// Decodes the body of a scrape response.
///
/// The records carry no info-hash, they are matched to the requested
/// `info_hashes` by position. A response with fewer records than requested
/// torrents only reports the first ones.
///
/// # Errors
///
/// Will return a [`DecodeError`] if the length is not a multiple of 12 or
/// if there are more records than requested torrents.
pub fn decode_scrape(info_hashes: &[InfoHash], bytes: &[u8]) -> Result<Scrape, DecodeError> {
    if bytes.len() % SCRAPE_INFO_LEN != 0 {
        return Err(DecodeError::MisalignedRecords {
            record: "scrape response",
            size: SCRAPE_INFO_LEN,
            len: bytes.len(),
        });
    }

    let records = bytes.len() / SCRAPE_INFO_LEN;

    if records > info_hashes.len() {
        return Err(DecodeError::TooManyRecords {
            expected: info_hashes.len(),
            actual: records,
        });
    }

    info_hashes
        .iter()
        .zip(bytes.chunks_exact(SCRAPE_INFO_LEN))
        .map(|(info_hash, chunk)| decode_scrape_info(chunk).map(|info| (*info_hash, info)))
        .collect()
}
