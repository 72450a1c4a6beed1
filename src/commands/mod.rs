//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `verify.rs`: suites against the candidate, failure analysis, report.
//! - `plan.rs`: addressing plan as automation facts.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate verification logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod plan;
pub mod verify;

pub use plan::handle_plan_command;
pub use verify::handle_verify_command;
