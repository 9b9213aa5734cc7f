//! # MoodMix Common Library
//!
//! Shared code for the MoodMix crates:
//! - Error type and result alias
//! - TOML bootstrap configuration
//! - Catalog and config path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
