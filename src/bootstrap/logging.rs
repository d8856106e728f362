//! Setup for the client logging.
//!
//! It redirects the log info to the standard output with the threshold and
//! the style defined in the configuration.
//!
//! - `off`
//! - `error`
//! - `warn`
//! - `info`
//! - `debug`
//! - `trace`
//!
//! Transport events are logged with the `HTTP tracker client` and
//! `UDP tracker client` targets.
use std::sync::Once;

use torrust_tracker_client_configuration::{Configuration, Threshold, TraceStyle};
use tracing::info;
use tracing::level_filters::LevelFilter;

static INIT: Once = Once::new();

/// It redirects the log info to the standard output. Only the first call
/// installs the subscriber.
pub fn setup(cfg: &Configuration) {
    let tracing_level = map_to_tracing_level_filter(cfg.logging.threshold);

    if tracing_level == LevelFilter::OFF {
        return;
    }

    INIT.call_once(|| {
        tracing_stdout_init(tracing_level, cfg.logging.style);
    });
}

fn map_to_tracing_level_filter(threshold: Threshold) -> LevelFilter {
    match threshold {
        Threshold::Off => LevelFilter::OFF,
        Threshold::Error => LevelFilter::ERROR,
        Threshold::Warn => LevelFilter::WARN,
        Threshold::Info => LevelFilter::INFO,
        Threshold::Debug => LevelFilter::DEBUG,
        Threshold::Trace => LevelFilter::TRACE,
    }
}

fn tracing_stdout_init(filter: LevelFilter, style: TraceStyle) {
    let builder = tracing_subscriber::fmt().with_max_level(filter).with_ansi(true);

    let () = match style {
        TraceStyle::Full => builder.init(),
        TraceStyle::Pretty => builder.pretty().with_file(true).init(),
        TraceStyle::Compact => builder.compact().init(),
        TraceStyle::Json => builder.json().init(),
    };

    info!("Logging initialized: {style}");
}
