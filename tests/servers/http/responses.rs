//! Bencoded tracker responses.
use std::collections::HashMap;

use serde::Serialize;
use serde_bencode::value::Value;
use torrust_tracker_client_primitives::{InfoHash, ScrapeInfo};

/// Announce response with a compact IPv4 peer list.
#[derive(Serialize, Debug)]
pub struct Announce {
    pub complete: u32,
    pub incomplete: u32,
    pub interval: u32,
    #[serde(rename = "min interval")]
    pub min_interval: u32,
    #[serde(with = "serde_bytes")]
    pub peers: Vec<u8>,
}

impl Announce {
    pub fn bencoded(&self) -> Vec<u8> {
        serde_bencode::to_bytes(self).unwrap()
    }
}

#[derive(Serialize, Debug)]
pub struct Error {
    #[serde(rename = "failure reason")]
    pub failure_reason: String,
}

impl Error {
    pub fn bencoded(reason: &str) -> Vec<u8> {
        serde_bencode::to_bytes(&Self {
            failure_reason: reason.to_owned(),
        })
        .unwrap()
    }
}

pub fn scrape(files: &[(InfoHash, ScrapeInfo)]) -> Vec<u8> {
    let files = files
        .iter()
        .map(|(info_hash, info)| {
            let file = HashMap::from([
                (b"complete".to_vec(), Value::Int(i64::from(info.complete))),
                (b"downloaded".to_vec(), Value::Int(i64::from(info.downloaded))),
                (b"incomplete".to_vec(), Value::Int(i64::from(info.incomplete))),
            ]);

            (info_hash.bytes().to_vec(), Value::Dict(file))
        })
        .collect();

    serde_bencode::to_bytes(&Value::Dict(HashMap::from([(b"files".to_vec(), Value::Dict(files))]))).unwrap()
}
