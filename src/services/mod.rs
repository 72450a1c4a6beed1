//! Service layer containing verification logic and side-effect helpers.
//!
//! ## Service map
//! - `address_plan.rs`: point-to-point addressing plan for spine/leaf links.
//! - `config_sanity.rs`: undefined/unused structure suite.
//! - `control_plane.rs`: leaf BGP peering suite.
//! - `data_plane.rs`: loopback registry + traceroute path suite.
//! - `differential.rs`: failure snapshot re-run + reachability regressions.
//! - `report.rs`: violation recording and verdict aggregation.
//! - `settings.rs`: TOML config loading.
//! - `logging.rs`: tracing subscriber setup.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Suites only talk to the oracle; the report only sees suite outcomes.
//! - A violation never aborts a suite; an oracle error always does.
//! - Keep command handlers thin; delegate to services.

pub mod address_plan;
pub mod config_sanity;
pub mod control_plane;
pub mod data_plane;
pub mod differential;
pub mod logging;
pub mod output;
pub mod report;
pub mod settings;
