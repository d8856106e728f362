//! Scrape request and response.
//!
//! See [BEP 48. Tracker Protocol Extension: Scrape](https://www.bittorrent.org/beps/bep_0048.html).
use std::collections::BTreeMap;

use derive_more::From;

use crate::info_hash::InfoHash;

/// The torrents a scrape request asks about, in request order.
///
/// It can be empty. What an empty scrape means depends on the tracker
/// transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, From)]
pub struct ScrapeQuery {
    info_hashes: Vec<InfoHash>,
}

impl ScrapeQuery {
    #[must_use]
    pub fn new(info_hashes: Vec<InfoHash>) -> Self {
        Self { info_hashes }
    }

    #[must_use]
    pub fn info_hashes(&self) -> &[InfoHash] {
        &self.info_hashes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.info_hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info_hashes.is_empty()
    }
}

impl From<InfoHash> for ScrapeQuery {
    fn from(info_hash: InfoHash) -> Self {
        Self {
            info_hashes: vec![info_hash],
        }
    }
}

impl FromIterator<InfoHash> for ScrapeQuery {
    fn from_iter<T: IntoIterator<Item = InfoHash>>(iter: T) -> Self {
        Self {
            info_hashes: iter.into_iter().collect(),
        }
    }
}

/// Swarm statistics for one torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScrapeInfo {
    /// (i.e `seeders`): The number of active peers that have completed downloading.
    pub complete: u32,
    /// (i.e `completed`): The number of peers that have ever completed downloading.
    pub downloaded: u32,
    /// (i.e `leechers`): The number of active peers that have not completed downloading.
    pub incomplete: u32,
    /// The torrent name, if the tracker knows and sends it.
    pub name: Option<String>,
}

impl ScrapeInfo {
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Scrape response: the statistics for each torrent the tracker reported.
///
/// Trackers may silently leave out the torrents they do not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scrape {
    files: BTreeMap<InfoHash, ScrapeInfo>,
}

impl Scrape {
    #[must_use]
    pub fn with_one_file(info_hash: InfoHash, info: ScrapeInfo) -> Self {
        let mut files = BTreeMap::new();
        files.insert(info_hash, info);
        Self { files }
    }

    /// Adds (or replaces) the statistics for one torrent.
    pub fn insert(&mut self, info_hash: InfoHash, info: ScrapeInfo) -> Option<ScrapeInfo> {
        self.files.insert(info_hash, info)
    }

    #[must_use]
    pub fn get(&self, info_hash: &InfoHash) -> Option<&ScrapeInfo> {
        self.files.get(info_hash)
    }

    /// Takes the statistics for one torrent out of the response.
    pub fn remove(&mut self, info_hash: &InfoHash) -> Option<ScrapeInfo> {
        self.files.remove(info_hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, InfoHash, ScrapeInfo> {
        self.files.iter()
    }
}

impl FromIterator<(InfoHash, ScrapeInfo)> for Scrape {
    fn from_iter<T: IntoIterator<Item = (InfoHash, ScrapeInfo)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl Extend<(InfoHash, ScrapeInfo)> for Scrape {
    fn extend<T: IntoIterator<Item = (InfoHash, ScrapeInfo)>>(&mut self, iter: T) {
        self.files.extend(iter);
    }
}

impl IntoIterator for Scrape {
    type Item = (InfoHash, ScrapeInfo);
    type IntoIter = std::collections::btree_map::IntoIter<InfoHash, ScrapeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a Scrape {
    type Item = (&'a InfoHash, &'a ScrapeInfo);
    type IntoIter = std::collections::btree_map::Iter<'a, InfoHash, ScrapeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
