//! Lenscast Common Utilities
//!
//! Shared infrastructure for all Lenscast crates:
//! - Error types and result aliases
//! - Clock and cadence utilities shared by the input and frame contexts
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
