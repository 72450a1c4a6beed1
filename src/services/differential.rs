use crate::domain::models::{FabricSettings, ReachabilityRegression, SuiteOutcome};
use crate::oracle::{OracleError, SnapshotHandle, SnapshotOracle};
use crate::services::data_plane::run_data_plane;
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug)]
pub struct FailureAnalysis {
    /// Data-plane suite re-run against the failure snapshot.
    pub data_plane: SuiteOutcome,
    /// Flows that stop working once the failure is applied. Informational only.
    pub regressions: Vec<ReachabilityRegression>,
}

pub fn analyze_failure<O: SnapshotOracle + ?Sized>(
    oracle: &O,
    candidate: &SnapshotHandle,
    failure: &SnapshotHandle,
    fabric: &FabricSettings,
) -> Result<FailureAnalysis, OracleError> {
    info!(snapshot = %failure, "analysing failure conditions");
    let data_plane = run_data_plane(oracle, failure, fabric)?;

    let rows = oracle.reachability_diff(candidate, failure)?;
    let regressions: Vec<ReachabilityRegression> = rows
        .into_iter()
        .map(|r| ReachabilityRegression {
            src_ip: r.flow.src_ip,
            dst_ip: r.flow.dst_ip,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    info!(
        flows = regressions.len(),
        "the following flows will fail as the result of an outage"
    );
    for r in &regressions {
        info!("{} -> {}", r.src_ip, r.dst_ip);
    }

    Ok(FailureAnalysis {
        data_plane,
        regressions,
    })
}
