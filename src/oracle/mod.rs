//! Network-model oracle boundary.
//!
//! The verification services never look inside a snapshot; they ask the
//! oracle structured questions and get rows back. Every query names the
//! snapshot it targets through a [`SnapshotHandle`], so there is no
//! "currently selected snapshot" anywhere in the process.
//!
//! ## Adapters
//! - `http.rs`: live network-model service over blocking HTTP.
//! - `replay.rs`: answers recorded next to each snapshot (`--replay`, tests).
//! - `pattern.rs`: node filter matching used by the replay adapter.

pub mod http;
pub mod pattern;
pub mod replay;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use http::HttpOracle;
pub use pattern::NodePattern;
pub use replay::{RecordedSnapshot, RecordedTrace, ReplayOracle};

#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    #[error("oracle unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("oracle rejected {question} (HTTP {status}): {body}")]
    Rejected {
        question: String,
        status: u16,
        body: String,
    },
    #[error("malformed answer to {question}: {reason}")]
    MalformedAnswer { question: String, reason: String },
    #[error("unknown snapshot: {0}")]
    UnknownSnapshot(String),
    #[error("cannot read snapshot data at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Name of one ingested configuration set held by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotHandle {
    name: String,
}

impl SnapshotHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SnapshotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NodeRow {
    #[serde(rename = "Node")]
    pub node: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BgpSessionRow {
    #[serde(rename = "Node")]
    pub node: String,
    /// `None` when the peer could not be resolved to a modeled node.
    #[serde(rename = "Remote_Node", default)]
    pub remote_node: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct IpOwnerRow {
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Active")]
    pub active: bool,
}

/// Undefined reference or unused structure, as reported by the oracle.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StructureRow {
    #[serde(rename = "File_Name", default)]
    pub file_name: Option<String>,
    #[serde(rename = "Struct_Type", alias = "Structure_Type")]
    pub struct_type: String,
    #[serde(rename = "Ref_Name", alias = "Structure_Name")]
    pub name: String,
    #[serde(rename = "Context", default)]
    pub context: Option<String>,
}

impl fmt::Display for StructureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file_name {
            write!(f, "{}: ", file)?;
        }
        write!(f, "{} {}", self.struct_type, self.name)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FlowHeader {
    #[serde(rename = "srcIps")]
    pub src_ip: String,
    #[serde(rename = "dstIps")]
    pub dst_ip: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Accepted,
    DeliveredToSubnet,
    ExitsNetwork,
    DeniedIn,
    DeniedOut,
    NoRoute,
    NullRouted,
    NeighborUnreachable,
    InsufficientInfo,
    Loop,
    #[serde(other)]
    Unknown,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Accepted => "ACCEPTED",
            Disposition::DeliveredToSubnet => "DELIVERED_TO_SUBNET",
            Disposition::ExitsNetwork => "EXITS_NETWORK",
            Disposition::DeniedIn => "DENIED_IN",
            Disposition::DeniedOut => "DENIED_OUT",
            Disposition::NoRoute => "NO_ROUTE",
            Disposition::NullRouted => "NULL_ROUTED",
            Disposition::NeighborUnreachable => "NEIGHBOR_UNREACHABLE",
            Disposition::InsufficientInfo => "INSUFFICIENT_INFO",
            Disposition::Loop => "LOOP",
            Disposition::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Hop {
    pub node: String,
}

/// One distinct path taken by a simulated flow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Trace {
    pub disposition: Disposition,
    #[serde(default)]
    pub hops: Vec<Hop>,
}

impl Trace {
    pub fn describe(&self) -> String {
        let nodes: Vec<&str> = self.hops.iter().map(|h| h.node.as_str()).collect();
        format!("[{}] {}", self.disposition, nodes.join(" -> "))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Flow {
    #[serde(rename = "srcIp")]
    pub src_ip: String,
    #[serde(rename = "dstIp")]
    pub dst_ip: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FlowRow {
    pub flow: Flow,
}

/// Query contract every oracle adapter answers.
///
/// Queries are blocking and are issued one at a time; a failed query is
/// returned as-is, there is no retry.
pub trait SnapshotOracle {
    fn load_snapshot(&mut self, path: &Path, name: &str) -> Result<SnapshotHandle, OracleError>;

    fn node_properties(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<NodeRow>, OracleError>;

    fn bgp_session_status(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<BgpSessionRow>, OracleError>;

    fn ip_owners(&self, snapshot: &SnapshotHandle) -> Result<Vec<IpOwnerRow>, OracleError>;

    /// Distinct paths of the first answer row; empty when nothing was traced.
    fn traceroute(
        &self,
        snapshot: &SnapshotHandle,
        start_location: &str,
        header: &FlowHeader,
    ) -> Result<Vec<Trace>, OracleError>;

    fn undefined_references(
        &self,
        snapshot: &SnapshotHandle,
    ) -> Result<Vec<StructureRow>, OracleError>;

    fn unused_structures(&self, snapshot: &SnapshotHandle)
        -> Result<Vec<StructureRow>, OracleError>;

    /// Flows accepted in `snapshot` that `reference` no longer accepts.
    fn reachability_diff(
        &self,
        snapshot: &SnapshotHandle,
        reference: &SnapshotHandle,
    ) -> Result<Vec<FlowRow>, OracleError>;
}
