//! Shared types and configuration for the lyrebird lyrics service
//!
//! Holds the data model exchanged between the fetch orchestrator and its
//! callers (the routing layer, the cache), the common error type, and the
//! TOML configuration loader. No fetching logic lives here.

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
