use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// spine -> leaf -> links between them.
pub type Topology = BTreeMap<String, BTreeMap<String, Vec<Link>>>;

/// node -> peer -> addressing of the link towards that peer.
pub type AddressAssignment = BTreeMap<String, BTreeMap<String, LinkAddressing>>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Link {
    pub ipv4_subnet: String,
    /// Interface pair per build environment (`lab`, `prod`, ...).
    #[serde(flatten)]
    pub environments: BTreeMap<String, InterfacePair>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct InterfacePair {
    pub local: String,
    pub remote: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LinkAddressing {
    pub my_ip: String,
    pub peer_ip: String,
    pub my_intf: String,
    pub peer_intf: String,
}

/// Parameters handed over by the automation framework.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlanParams {
    pub clos: Topology,
    pub env: String,
}

#[derive(Debug, Serialize)]
pub struct PlanFacts {
    pub ipam: AddressAssignment,
}

#[derive(Debug, Serialize)]
pub struct PlanOut {
    pub changed: bool,
    pub ansible_facts: PlanFacts,
}

#[derive(Debug, Serialize)]
pub struct PlanFailure {
    pub failed: bool,
    pub msg: String,
}
