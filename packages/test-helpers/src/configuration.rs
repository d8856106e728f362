use std::time::Duration;

use torrust_tracker_client_configuration::{Configuration, Threshold};

/// This configuration is used for testing. Trackers under test run on the
/// loopback interface, so the timeouts are short enough to make the tests
/// for unresponsive trackers fast.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    config.http.timeout = Duration::from_secs(2);
    config.udp.timeout = Duration::from_secs(2);

    config
}

/// Same as [`ephemeral`] but the HTTP transport rejects scrape requests
/// without info-hashes.
#[must_use]
pub fn ephemeral_rejecting_empty_scrapes() -> Configuration {
    let mut config = ephemeral();

    config.http.empty_scrape = torrust_tracker_client_configuration::EmptyScrape::Reject;

    config
}
