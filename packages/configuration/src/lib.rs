//! Configuration data structures for the [Torrust Tracker Client](https://docs.rs/torrust-tracker-client).
//!
//! The client talks to `BitTorrent` trackers over HTTP and UDP. This module
//! contains the settings for both transports and for logging.
//!
//! The configuration is loaded from a [TOML](https://toml.io/en/) file or
//! from an environment variable with the same content as the file:
//!
//! - `TORRUST_TRACKER_CLIENT_CONFIG_TOML`: the whole TOML content. It has
//!   priority over the file.
//! - `TORRUST_TRACKER_CLIENT_CONFIG_TOML_PATH`: the file location.
//!
//! Any value can be overridden with an environment variable prefixed with
//! `TORRUST_TRACKER_CLIENT_CONFIG_OVERRIDE_`, using `__` to separate the
//! section from the field. For example:
//!
//! ```text
//! TORRUST_TRACKER_CLIENT_CONFIG_OVERRIDE_UDP__TIMEOUT=3
//! ```
//!
//! Missing values take their defaults. The default configuration is:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//! style = "full"
//!
//! [http]
//! timeout = 15
//! user_agent = "torrust-tracker-client"
//! compact = true
//! empty_scrape = "scrape_all"
//! max_redirects = 3
//!
//! [udp]
//! timeout = 15
//! bind_ip = "0.0.0.0"
//! bind_ip_v6 = "::"
//! ```
pub mod http;
pub mod logging;
pub mod udp;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::http::{EmptyScrape, Http};
pub use self::logging::{Logging, Threshold, TraceStyle};
pub use self::udp::Udp;

/// Default timeout for a whole request round trip to a tracker.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// Environment variables

/// The whole `tracker-client.toml` file content. It has priority over the
/// config file. Even if the file is not on the default path.
const ENV_VAR_CONFIG_TOML: &str = "TORRUST_TRACKER_CLIENT_CONFIG_TOML";

/// The `tracker-client.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "TORRUST_TRACKER_CLIENT_CONFIG_TOML_PATH";

/// Prefix for the environment variables that override single values.
pub const CONFIG_OVERRIDE_PREFIX: &str = "TORRUST_TRACKER_CLIENT_CONFIG_OVERRIDE_";

/// Path separator in the override environment variables.
pub const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: Option<String>,
}

impl Info {
    /// Build Configuration Info from the environment, falling back to the
    /// given file path.
    #[must_use]
    pub fn new(default_config_toml_path: String) -> Self {
        let config_toml = env::var(ENV_VAR_CONFIG_TOML).ok();

        let config_toml_path = match env::var(ENV_VAR_CONFIG_TOML_PATH) {
            Ok(config_toml_path) => config_toml_path,
            Err(_) => default_config_toml_path,
        };

        Self {
            config_toml,
            config_toml_path: Some(config_toml_path),
        }
    }

    /// Configuration given as TOML content.
    #[must_use]
    pub fn from_toml(config_toml: &str) -> Self {
        Self {
            config_toml: Some(config_toml.to_owned()),
            config_toml_path: None,
        }
    }

    /// Configuration read from a TOML file.
    #[must_use]
    pub fn from_path(config_toml_path: &str) -> Self {
        Self {
            config_toml: None,
            config_toml_path: Some(config_toml_path.to_owned()),
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The configuration file was explicitly requested but it does not exist.
    #[error("Unable to load from Config File: `{path}` does not exist")]
    MissingConfigFile { path: String },

    /// Invalid TOML or values that can not be converted to the expected type.
    #[error("Failed processing the configuration: {source}")]
    ConfigError { source: Arc<figment::Error> },

    #[error("Unable to encode the configuration to TOML: {source}")]
    UnableToEncodeToml { source: Arc<toml::ser::Error> },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigError { source: Arc::new(err) }
    }
}

/// Core configuration for the tracker client.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    /// Logging configuration.
    #[serde(default)]
    pub logging: Logging,

    /// HTTP trackers configuration.
    #[serde(default)]
    pub http: Http,

    /// UDP trackers configuration.
    #[serde(default)]
    pub udp: Udp,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct.
    ///
    /// The TOML content has priority over the file. The override
    /// environment variables have priority over both.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file does not exist or if the configuration
    /// is not valid.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()));

        let figment = match (&info.config_toml, &info.config_toml_path) {
            (Some(config_toml), _) => figment.merge(Toml::string(config_toml)),
            (None, Some(config_toml_path)) => {
                if !std::path::Path::new(config_toml_path).exists() {
                    return Err(Error::MissingConfigFile {
                        path: config_toml_path.clone(),
                    });
                }
                figment.merge(Toml::file(config_toml_path))
            }
            (None, None) => figment,
        };

        let figment = figment.merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR));

        let config: Configuration = figment.extract()?;

        Ok(config)
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration can not be encoded.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(|err| Error::UnableToEncodeToml { source: Arc::new(err) })
    }
}
