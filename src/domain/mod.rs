//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep topology, addressing and report structs in one place.
//! - Avoid cyclic imports between services and the oracle adapters.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `topology.rs`: fabric description and the derived addressing plan.
//! - `models.rs`: settings, violations, suite outcomes, report/output structs.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network/logging side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` and `plan` outputs.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod models;
pub mod topology;
