use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

use crate::DEFAULT_TIMEOUT;

/// Configuration for the HTTP tracker transport.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Http {
    /// Maximum time in seconds for a whole request, including the redirects.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Http::default_timeout")]
    pub timeout: Duration,

    /// Value of the `User-Agent` header.
    #[serde(default = "Http::default_user_agent")]
    pub user_agent: String,

    /// Whether the announce requests ask for the compact peer list
    /// (`compact=1`).
    #[serde(default = "Http::default_compact")]
    pub compact: bool,

    /// What to do with a scrape request without info-hashes.
    #[serde(default = "Http::default_empty_scrape")]
    pub empty_scrape: EmptyScrape,

    /// Maximum number of redirects to follow. `0` disables them.
    #[serde(default = "Http::default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            compact: Self::default_compact(),
            empty_scrape: Self::default_empty_scrape(),
            max_redirects: Self::default_max_redirects(),
        }
    }
}

impl Http {
    fn default_timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    fn default_user_agent() -> String {
        String::from("torrust-tracker-client")
    }

    fn default_compact() -> bool {
        true
    }

    fn default_empty_scrape() -> EmptyScrape {
        EmptyScrape::ScrapeAll
    }

    fn default_max_redirects() -> usize {
        3
    }
}

/// Behavior of a scrape request with no info-hashes.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EmptyScrape {
    /// Send the bare scrape URL. Trackers that allow it answer with every
    /// torrent they know.
    ScrapeAll,
    /// Fail without contacting the tracker.
    Reject,
}
