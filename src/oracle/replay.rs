use super::{
    BgpSessionRow, Disposition, Flow, FlowHeader, FlowRow, IpOwnerRow, NodePattern, NodeRow,
    OracleError, SnapshotHandle, SnapshotOracle, StructureRow, Trace,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Oracle answers recorded for one snapshot.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecordedSnapshot {
    #[serde(default)]
    pub node_properties: Vec<NodeRow>,
    #[serde(default)]
    pub bgp_sessions: Vec<BgpSessionRow>,
    #[serde(default)]
    pub ip_owners: Vec<IpOwnerRow>,
    #[serde(default)]
    pub traceroutes: Vec<RecordedTrace>,
    #[serde(default)]
    pub undefined_references: Vec<StructureRow>,
    #[serde(default)]
    pub unused_structures: Vec<StructureRow>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecordedTrace {
    pub start_location: String,
    pub src_ip: String,
    pub dst_ip: String,
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl RecordedTrace {
    fn accepted(&self) -> bool {
        self.traces
            .first()
            .map(|t| t.disposition == Disposition::Accepted)
            .unwrap_or(false)
    }
}

pub fn answers_path(snapshot_dir: &Path) -> PathBuf {
    snapshot_dir.join(".oracle").join("answers.json")
}

/// Serves recorded answers instead of asking a live network model.
#[derive(Debug, Default)]
pub struct ReplayOracle {
    snapshots: HashMap<String, RecordedSnapshot>,
}

impl ReplayOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, name: &str, recorded: RecordedSnapshot) -> Self {
        self.snapshots.insert(name.to_string(), recorded);
        self
    }

    fn recorded(&self, snapshot: &SnapshotHandle) -> Result<&RecordedSnapshot, OracleError> {
        self.snapshots
            .get(snapshot.name())
            .ok_or_else(|| OracleError::UnknownSnapshot(snapshot.name().to_string()))
    }
}

impl SnapshotOracle for ReplayOracle {
    fn load_snapshot(&mut self, path: &Path, name: &str) -> Result<SnapshotHandle, OracleError> {
        let file = answers_path(path);
        debug!(snapshot = name, path = %file.display(), "loading recorded answers");
        let raw = std::fs::read_to_string(&file).map_err(|source| OracleError::Io {
            path: file.display().to_string(),
            source,
        })?;
        let recorded: RecordedSnapshot =
            serde_json::from_str(&raw).map_err(|e| OracleError::MalformedAnswer {
                question: format!("recorded answers for {}", name),
                reason: e.to_string(),
            })?;
        self.snapshots.insert(name.to_string(), recorded);
        Ok(SnapshotHandle::new(name))
    }

    fn node_properties(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<NodeRow>, OracleError> {
        let pattern = NodePattern::parse(nodes);
        Ok(self
            .recorded(snapshot)?
            .node_properties
            .iter()
            .filter(|r| pattern.matches(&r.node))
            .cloned()
            .collect())
    }

    fn bgp_session_status(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<BgpSessionRow>, OracleError> {
        let pattern = NodePattern::parse(nodes);
        Ok(self
            .recorded(snapshot)?
            .bgp_sessions
            .iter()
            .filter(|r| pattern.matches(&r.node))
            .cloned()
            .collect())
    }

    fn ip_owners(&self, snapshot: &SnapshotHandle) -> Result<Vec<IpOwnerRow>, OracleError> {
        Ok(self.recorded(snapshot)?.ip_owners.clone())
    }

    fn traceroute(
        &self,
        snapshot: &SnapshotHandle,
        start_location: &str,
        header: &FlowHeader,
    ) -> Result<Vec<Trace>, OracleError> {
        Ok(self
            .recorded(snapshot)?
            .traceroutes
            .iter()
            .find(|t| {
                t.start_location == start_location
                    && t.src_ip == header.src_ip
                    && t.dst_ip == header.dst_ip
            })
            .map(|t| t.traces.clone())
            .unwrap_or_default())
    }

    fn undefined_references(
        &self,
        snapshot: &SnapshotHandle,
    ) -> Result<Vec<StructureRow>, OracleError> {
        Ok(self.recorded(snapshot)?.undefined_references.clone())
    }

    fn unused_structures(
        &self,
        snapshot: &SnapshotHandle,
    ) -> Result<Vec<StructureRow>, OracleError> {
        Ok(self.recorded(snapshot)?.unused_structures.clone())
    }

    fn reachability_diff(
        &self,
        snapshot: &SnapshotHandle,
        reference: &SnapshotHandle,
    ) -> Result<Vec<FlowRow>, OracleError> {
        let current = self.recorded(snapshot)?;
        let reference = self.recorded(reference)?;
        let mut rows = Vec::new();
        for flow in current.traceroutes.iter().filter(|t| t.accepted()) {
            let still_accepted = reference
                .traceroutes
                .iter()
                .find(|t| t.src_ip == flow.src_ip && t.dst_ip == flow.dst_ip)
                .map(RecordedTrace::accepted)
                .unwrap_or(false);
            if !still_accepted {
                rows.push(FlowRow {
                    flow: Flow {
                        src_ip: flow.src_ip.clone(),
                        dst_ip: flow.dst_ip.clone(),
                    },
                });
            }
        }
        Ok(rows)
    }
}
