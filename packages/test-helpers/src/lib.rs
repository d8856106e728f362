//! Testing helpers for the Torrust Tracker Client.
pub mod configuration;
pub mod random;
