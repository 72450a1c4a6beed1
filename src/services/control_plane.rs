use crate::domain::models::{Category, FabricSettings, SuiteKind, SuiteOutcome, Violation};
use crate::oracle::{OracleError, SnapshotHandle, SnapshotOracle};
use crate::services::report::flag;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

const UNRESOLVED: &str = "<unresolved>";

fn pair(node: &str, remote: Option<&str>) -> String {
    format!("{} -> {}", node, remote.unwrap_or(UNRESOLVED))
}

/// BGP peering invariants for leaves.
///
/// Two independent checks:
/// - per leaf, the remote peers minus the authoritative spine set must be empty;
/// - per session row, the remote node must carry the spine naming marker.
///
/// An unresolved remote node fails both.
pub fn run_control_plane<O: SnapshotOracle + ?Sized>(
    oracle: &O,
    snapshot: &SnapshotHandle,
    fabric: &FabricSettings,
) -> Result<SuiteOutcome, OracleError> {
    let mut outcome = SuiteOutcome::new(SuiteKind::ControlPlane, snapshot.name());

    let spines: BTreeSet<String> = oracle
        .node_properties(snapshot, &fabric.spine_nodes)?
        .into_iter()
        .map(|r| r.node)
        .collect();
    info!(snapshot = %snapshot, spines = spines.len(), "analyzing control plane properties");

    let sessions = oracle.bgp_session_status(snapshot, &fabric.leaf_nodes)?;

    let mut peers: BTreeMap<&str, BTreeSet<Option<&str>>> = BTreeMap::new();
    for row in &sessions {
        peers
            .entry(row.node.as_str())
            .or_default()
            .insert(row.remote_node.as_deref());
    }

    let mut outside_found = false;
    for (leaf, remotes) in &peers {
        let outside: Vec<&str> = remotes
            .iter()
            .filter(|r| r.map(|name| !spines.contains(name)).unwrap_or(true))
            .map(|r| r.unwrap_or(UNRESOLVED))
            .collect();
        if outside.is_empty() {
            continue;
        }
        outside_found = true;
        flag(
            &mut outcome,
            Violation::new(
                Category::ControlPlane,
                *leaf,
                format!("{} peers outside the spine set: {}", leaf, outside.join(", ")),
            )
            .with_evidence(remotes.iter().map(|r| pair(leaf, *r)).collect()),
        );
    }
    if !outside_found {
        info!("every leaf peers only within the spine set");
    }

    let mut non_spine_found = false;
    for row in &sessions {
        let is_spine = row
            .remote_node
            .as_deref()
            .map(|r| r.contains(fabric.spine_marker.as_str()))
            .unwrap_or(false);
        if is_spine {
            continue;
        }
        non_spine_found = true;
        let offending = pair(&row.node, row.remote_node.as_deref());
        flag(
            &mut outcome,
            Violation::new(
                Category::ControlPlane,
                row.node.clone(),
                format!("leaf peers with a non-spine node: {}", offending),
            )
            .with_evidence(vec![offending]),
        );
    }
    if !non_spine_found {
        info!("leaves only peer with spines");
    }

    Ok(outcome)
}
