//! Utilities
//!
//! Common utilities used throughout the relay.

pub mod error;
pub mod logging;
pub mod paths;

pub use error::*;
pub use paths::*;
