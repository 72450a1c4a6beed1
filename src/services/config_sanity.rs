use crate::domain::models::{Category, SuiteKind, SuiteOutcome, Violation};
use crate::oracle::{OracleError, SnapshotHandle, SnapshotOracle, StructureRow};
use crate::services::report::flag;
use tracing::info;

fn describe(rows: &[StructureRow]) -> Vec<String> {
    rows.iter().map(|r| r.to_string()).collect()
}

/// Undefined references and unused structures are both violations.
pub fn run_config_sanity<O: SnapshotOracle + ?Sized>(
    oracle: &O,
    snapshot: &SnapshotHandle,
) -> Result<SuiteOutcome, OracleError> {
    let mut outcome = SuiteOutcome::new(SuiteKind::ConfigSanity, snapshot.name());
    info!(snapshot = %snapshot, "searching for unused and undefined data structures");

    let undefined = oracle.undefined_references(snapshot)?;
    if undefined.is_empty() {
        info!("no undefined data structures found");
    } else {
        flag(
            &mut outcome,
            Violation::new(
                Category::ConfigSanity,
                "undefined_references",
                format!("found {} undefined data structures", undefined.len()),
            )
            .with_evidence(describe(&undefined)),
        );
    }

    let unused = oracle.unused_structures(snapshot)?;
    if unused.is_empty() {
        info!("no unused data structures found");
    } else {
        flag(
            &mut outcome,
            Violation::new(
                Category::ConfigSanity,
                "unused_structures",
                format!("found {} unused data structures", unused.len()),
            )
            .with_evidence(describe(&unused)),
        );
    }

    Ok(outcome)
}
