//! Client bootstrapping.
//!
//! Applications embedding the client call [`logging::setup`] once with the
//! loaded configuration before connecting to any tracker.
pub mod logging;
