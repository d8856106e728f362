//! Logging for the integration tests.
//!
//! Every test installs the subscriber through [`INIT`], so only the first
//! test to run sets it up. Client transport events go to the standard error.
use std::sync::Once;

use tracing::level_filters::LevelFilter;

pub static INIT: Once = Once::new();

pub fn tracing_stderr_init(filter: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .pretty()
        .with_file(true)
        .init();

    tracing::info!("Test logging initialized");
}
