//! Services
//!
//! Transports, git bootstrap, and the plan execution engine.

pub mod git_ops;
pub mod plan;
pub mod transport;
