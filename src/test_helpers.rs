#![cfg(test)]
#![allow(dead_code)]

use crate::domain::models::FabricSettings;
use crate::oracle::{
    BgpSessionRow, Disposition, Hop, IpOwnerRow, NodeRow, RecordedSnapshot, RecordedTrace,
    StructureRow, Trace,
};

pub fn node(name: &str) -> NodeRow {
    NodeRow {
        node: name.to_string(),
    }
}

pub fn bgp(node: &str, remote: Option<&str>) -> BgpSessionRow {
    BgpSessionRow {
        node: node.to_string(),
        remote_node: remote.map(str::to_string),
    }
}

pub fn owner(node: &str, interface: &str, ip: &str, active: bool) -> IpOwnerRow {
    IpOwnerRow {
        node: node.to_string(),
        interface: interface.to_string(),
        ip: ip.to_string(),
        active,
    }
}

pub fn structure(struct_type: &str, name: &str) -> StructureRow {
    StructureRow {
        file_name: Some("configs/leaf-1.cfg".to_string()),
        struct_type: struct_type.to_string(),
        name: name.to_string(),
        context: None,
    }
}

/// A trace with `hops` placeholder hops.
pub fn trace(disposition: &str, hops: usize) -> Trace {
    let disposition: Disposition =
        serde_json::from_value(serde_json::Value::String(disposition.to_string()))
            .expect("known disposition");
    Trace {
        disposition,
        hops: (0..hops)
            .map(|i| Hop {
                node: format!("hop-{}", i),
            })
            .collect(),
    }
}

pub fn recorded_trace(start: &str, src: &str, dst: &str, traces: Vec<Trace>) -> RecordedTrace {
    RecordedTrace {
        start_location: start.to_string(),
        src_ip: src.to_string(),
        dst_ip: dst.to_string(),
        traces,
    }
}

pub fn fabric() -> FabricSettings {
    FabricSettings::default()
}

/// Two spines, `leaf-1` and the source `leaf-3`, fully meshed and healthy.
pub fn healthy_fabric() -> RecordedSnapshot {
    RecordedSnapshot {
        node_properties: vec![
            node("spine-1"),
            node("spine-2"),
            node("leaf-1"),
            node("leaf-3"),
        ],
        bgp_sessions: vec![
            bgp("leaf-1", Some("spine-1")),
            bgp("leaf-1", Some("spine-2")),
            bgp("leaf-3", Some("spine-1")),
            bgp("leaf-3", Some("spine-2")),
            bgp("spine-1", Some("leaf-1")),
        ],
        ip_owners: vec![
            owner("spine-1", "Loopback0", "10.0.255.1", true),
            owner("spine-2", "Loopback0", "10.0.255.2", true),
            owner("leaf-1", "Loopback0", "10.0.255.11", true),
            owner("leaf-3", "Loopback0", "10.0.255.13", true),
            owner("leaf-3", "Ethernet1", "10.0.0.1", true),
        ],
        traceroutes: vec![recorded_trace(
            "leaf-3",
            "10.0.255.13",
            "10.0.255.11",
            vec![trace("ACCEPTED", 2), trace("ACCEPTED", 2)],
        )],
        undefined_references: vec![],
        unused_structures: vec![],
    }
}
