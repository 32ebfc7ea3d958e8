//! Plan Execution
//!
//! repair → execute → (optional) retry:
//! - `repair` - inserts missing directory-creation actions
//! - `sessions` - lazy per-provider sessions with ordered teardown
//! - `executor` - sequential dispatch and the auth recovery call
//! - `normalizer` - provider responses to the result envelope
//! - `recovery` - at-most-once plan retry for the music provider
//! - `runner` - blocking entry points

pub mod executor;
pub mod normalizer;
pub mod recovery;
pub mod repair;
pub mod runner;
pub mod sessions;

pub use executor::{execute_plan, PlanExecutor};
pub use normalizer::{normalize, NormalizedResponse};
pub use recovery::{execute_plan_with_retry, RetryPolicy};
pub use repair::repair_plan;
pub use runner::{execute_plan_blocking, run_plan_blocking, RunOptions};
pub use sessions::{SessionKey, SessionManager};
