//! Data Models
//!
//! Configuration structures used throughout the relay. The plan data model
//! itself lives in `plan_relay_core`.

pub mod settings;

pub use settings::*;
