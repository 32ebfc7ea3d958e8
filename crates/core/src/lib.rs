//! Plan Relay Core
//!
//! Data model, path resolution, and error types shared by the Plan Relay
//! workspace. This crate knows nothing about transports, processes, or
//! async runtimes.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `action` - Plan data model (`Action`, `ExecutionResult`, `ProviderId`, `PlanDocument`)
//! - `paths` - Path normalization and allowed-directory derivation

pub mod action;
pub mod error;
pub mod paths;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Plan Data Model ────────────────────────────────────────────────────
pub use action::{Action, Args, ExecutionResult, PlanDocument, ProviderId};
