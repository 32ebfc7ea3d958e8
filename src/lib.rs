//! Plan Relay
//!
//! Executes planner-produced action lists against heterogeneous tool
//! providers: MCP servers over stdio (filesystem, git, music catalog), a
//! line-framed JSON-RPC process (game analytics), and an HTTP JSON-RPC
//! endpoint (movie catalog).
//!
//! ## Module Organization
//!
//! - `models` - Relay settings (provider launch configuration)
//! - `services` - Transports, git bootstrap, and the plan engine
//! - `utils` - Errors, logging, and application paths

pub mod models;
pub mod services;
pub mod utils;

pub use models::settings::RelaySettings;
pub use services::plan::{
    execute_plan, execute_plan_blocking, execute_plan_with_retry, repair_plan,
    run_plan_blocking, RetryPolicy, RunOptions,
};
pub use utils::error::{AppError, AppResult};

pub use plan_relay_core::{Action, ExecutionResult, PlanDocument, ProviderId};
