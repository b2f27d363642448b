//! gantry-core — domain types and dispatch configuration.
//!
//! The value objects the dispatch layer consumes: process records,
//! staging bundles, lifecycle descriptors, and the runtime
//! configuration that selects which scheduler backend serves each
//! lifecycle operation. Everything here arrives from the host platform
//! already validated; this crate does no I/O beyond loading the
//! configuration file.

pub mod config;
pub mod types;

pub use config::DispatchConfig;
pub use types::*;
