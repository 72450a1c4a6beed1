use crate::domain::models::{Category, FabricSettings, SuiteKind, SuiteOutcome, Violation};
use crate::oracle::{
    Disposition, FlowHeader, IpOwnerRow, OracleError, SnapshotHandle, SnapshotOracle, Trace,
};
use crate::services::report::flag;
use std::collections::BTreeMap;
use tracing::info;

/// Active loopback address per node for one snapshot.
#[derive(Debug, Default, Clone)]
pub struct LoopbackRegistry {
    loopbacks: BTreeMap<String, String>,
    /// Nodes that answered with more than one active loopback address.
    extra: BTreeMap<String, Vec<String>>,
}

impl LoopbackRegistry {
    pub fn from_rows(rows: &[IpOwnerRow], interface: &str) -> Self {
        let mut registry = Self::default();
        for row in rows
            .iter()
            .filter(|r| r.active && r.interface == interface)
        {
            if registry.loopbacks.contains_key(&row.node) {
                registry
                    .extra
                    .entry(row.node.clone())
                    .or_default()
                    .push(row.ip.clone());
            } else {
                registry.loopbacks.insert(row.node.clone(), row.ip.clone());
            }
        }
        registry
    }

    pub fn build<O: SnapshotOracle + ?Sized>(
        oracle: &O,
        snapshot: &SnapshotHandle,
        interface: &str,
    ) -> Result<Self, OracleError> {
        Ok(Self::from_rows(&oracle.ip_owners(snapshot)?, interface))
    }

    pub fn loopback(&self, node: &str) -> Option<&str> {
        self.loopbacks.get(node).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.loopbacks.iter().map(|(n, ip)| (n.as_str(), ip.as_str()))
    }

    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.extra.iter().map(|(n, ips)| (n.as_str(), ips.as_slice()))
    }
}

struct LeafTrace<'a> {
    node: &'a str,
    dst_ip: &'a str,
    traces: Vec<Trace>,
}

impl LeafTrace<'_> {
    fn subject(&self) -> String {
        format!("{} ({})", self.node, self.dst_ip)
    }

    /// Disposition of the first trace, as the verdict for the whole flow.
    fn disposition(&self) -> Option<&Disposition> {
        self.traces.first().map(|t| &t.disposition)
    }
}

/// Traceroute from `fabric.source_node` to every other leaf loopback and
/// check disposition, path count (one per spine) and path length.
pub fn run_data_plane<O: SnapshotOracle + ?Sized>(
    oracle: &O,
    snapshot: &SnapshotHandle,
    fabric: &FabricSettings,
) -> Result<SuiteOutcome, OracleError> {
    let mut outcome = SuiteOutcome::new(SuiteKind::DataPlane, snapshot.name());
    let source = fabric.source_node.as_str();

    let registry = LoopbackRegistry::build(oracle, snapshot, &fabric.loopback_interface)?;
    for (node, ips) in registry.duplicates() {
        flag(
            &mut outcome,
            Violation::new(
                Category::Loopback,
                node,
                format!(
                    "{} has more than one active {} address",
                    node, fabric.loopback_interface
                ),
            )
            .with_evidence(ips.to_vec()),
        );
    }

    let Some(local_ip) = registry.loopback(source) else {
        flag(
            &mut outcome,
            Violation::new(
                Category::Reachability,
                source,
                format!(
                    "source node has no active {} address",
                    fabric.loopback_interface
                ),
            ),
        );
        return Ok(outcome);
    };

    let leaves: Vec<(&str, &str)> = registry
        .iter()
        .filter(|(node, ip)| {
            node.contains(fabric.leaf_marker.as_str()) && *node != source && *ip != local_ip
        })
        .collect();
    let expected_paths = registry
        .iter()
        .filter(|(node, _)| node.contains(fabric.spine_marker.as_str()))
        .count();

    info!(
        snapshot = %snapshot,
        source,
        leaves = leaves.len(),
        spines = expected_paths,
        "analyzing traceroute from source leaf"
    );

    let mut traced = Vec::with_capacity(leaves.len());
    for (node, dst_ip) in leaves {
        let header = FlowHeader {
            src_ip: local_ip.to_string(),
            dst_ip: dst_ip.to_string(),
        };
        let traces = oracle.traceroute(snapshot, source, &header)?;
        traced.push(LeafTrace {
            node,
            dst_ip,
            traces,
        });
    }

    for leaf in &traced {
        match leaf.disposition() {
            Some(Disposition::Accepted) => {
                info!(leaf = leaf.node, "traceroute accepted");
            }
            other => {
                let disposition = other.map(Disposition::as_str).unwrap_or("NO_TRACE");
                flag(
                    &mut outcome,
                    Violation::new(
                        Category::Reachability,
                        leaf.subject(),
                        format!("traceroute from {} has failed: {}", source, disposition),
                    ),
                );
            }
        }

        if fabric.check_multipath {
            let actual = leaf.traces.len();
            if actual != expected_paths {
                flag(
                    &mut outcome,
                    Violation::new(
                        Category::MultipathCount,
                        leaf.subject(),
                        format!(
                            "number of paths {} != {} number of spines",
                            actual, expected_paths
                        ),
                    )
                    .with_counts(expected_paths, actual)
                    .with_evidence(leaf.traces.iter().map(Trace::describe).collect()),
                );
            } else {
                info!(leaf = leaf.node, paths = actual, "path count matches spine count");
            }
        }

        for path in &leaf.traces {
            let hops = path.hops.len();
            if hops != fabric.expected_hops {
                flag(
                    &mut outcome,
                    Violation::new(
                        Category::PathLength,
                        leaf.subject(),
                        format!(
                            "traceroute has not traversed exactly {} hops",
                            fabric.expected_hops
                        ),
                    )
                    .with_counts(fabric.expected_hops, hops)
                    .with_evidence(vec![path.describe()]),
                );
            }
        }
    }

    Ok(outcome)
}
