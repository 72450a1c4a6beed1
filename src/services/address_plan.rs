use crate::domain::topology::{AddressAssignment, LinkAddressing, PlanParams, Topology};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::warn;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AddressPlanningError {
    #[error("malformed subnet {subnet:?}: {reason}")]
    MalformedSubnet { subnet: String, reason: String },
    #[error("subnet {subnet} has fewer than 2 usable addresses")]
    TooFewHosts { subnet: String },
    #[error("link {spine} <-> {leaf} has no interfaces for environment {env:?}")]
    MissingEnvironment {
        spine: String,
        leaf: String,
        env: String,
    },
    #[error("subnet {subnet} of {second} overlaps the subnet of {first}")]
    SubnetReused {
        subnet: String,
        first: String,
        second: String,
    },
}

/// First and last usable host of a block. /31 point-to-point blocks use
/// both addresses; /32 has nothing to share.
pub fn usable_range(net: &Ipv4Net) -> Option<(Ipv4Addr, Ipv4Addr)> {
    match net.prefix_len() {
        32 => None,
        31 => Some((net.network(), net.broadcast())),
        _ => Some((
            Ipv4Addr::from(u32::from(net.network()) + 1),
            Ipv4Addr::from(u32::from(net.broadcast()) - 1),
        )),
    }
}

fn parse_subnet(raw: &str) -> Result<Ipv4Net, AddressPlanningError> {
    raw.trim()
        .parse::<Ipv4Net>()
        .map(|net| net.trunc())
        .map_err(|e| AddressPlanningError::MalformedSubnet {
            subnet: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Returns true when an earlier link towards the same peer was replaced.
fn populate(
    ipam: &mut AddressAssignment,
    node: &str,
    peer: &str,
    my_ip: &str,
    peer_ip: &str,
    my_intf: &str,
    peer_intf: &str,
) -> bool {
    ipam.entry(node.to_string())
        .or_default()
        .insert(
            peer.to_string(),
            LinkAddressing {
                my_ip: my_ip.to_string(),
                peer_ip: peer_ip.to_string(),
                my_intf: my_intf.to_string(),
                peer_intf: peer_intf.to_string(),
            },
        )
        .is_some()
}

/// Derive point-to-point addressing for every spine/leaf link.
///
/// The spine side takes the first usable address of the link subnet and the
/// leaf side the last one, both carrying the subnet's prefix length. Both
/// directions are recorded with mirrored fields.
pub fn plan(topology: &Topology, env: &str) -> Result<AddressAssignment, AddressPlanningError> {
    let mut ipam = AddressAssignment::new();
    let mut claimed: Vec<(Ipv4Net, String)> = Vec::new();

    for (spine, leaves) in topology {
        for (leaf, links) in leaves {
            for link in links {
                let intf = link.environments.get(env).ok_or_else(|| {
                    AddressPlanningError::MissingEnvironment {
                        spine: spine.clone(),
                        leaf: leaf.clone(),
                        env: env.to_string(),
                    }
                })?;

                let subnet = parse_subnet(&link.ipv4_subnet)?;
                let pair = format!("{}<->{}", spine, leaf);
                if let Some((_, first)) = claimed
                    .iter()
                    .find(|(net, _)| net.contains(&subnet) || subnet.contains(net))
                {
                    return Err(AddressPlanningError::SubnetReused {
                        subnet: subnet.to_string(),
                        first: first.clone(),
                        second: pair,
                    });
                }
                claimed.push((subnet, pair));

                let (first, last) =
                    usable_range(&subnet).ok_or_else(|| AddressPlanningError::TooFewHosts {
                        subnet: subnet.to_string(),
                    })?;
                let prefix_len = subnet.prefix_len();
                let spine_ip = format!("{}/{}", first, prefix_len);
                let leaf_ip = format!("{}/{}", last, prefix_len);

                let replaced = populate(
                    &mut ipam,
                    spine,
                    leaf,
                    &spine_ip,
                    &leaf_ip,
                    &intf.local,
                    &intf.remote,
                );
                populate(
                    &mut ipam,
                    leaf,
                    spine,
                    &leaf_ip,
                    &spine_ip,
                    &intf.remote,
                    &intf.local,
                );
                if replaced {
                    warn!(
                        spine = %spine,
                        leaf = %leaf,
                        subnet = %subnet,
                        "several links between one pair; the last link wins"
                    );
                }
            }
        }
    }

    Ok(ipam)
}

/// Reads `{clos, env}` from a JSON or YAML file (by extension).
pub fn load_params(path: &Path) -> anyhow::Result<PlanParams> {
    let raw = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&raw)?)
    } else {
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{load_params, plan, usable_range, AddressPlanningError};
    use crate::domain::topology::{InterfacePair, Link, Topology};
    use ipnet::Ipv4Net;
    use std::collections::BTreeMap;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn link(subnet: &str, local: &str, remote: &str) -> Link {
        let mut environments = BTreeMap::new();
        environments.insert(
            "lab".to_string(),
            InterfacePair {
                local: local.to_string(),
                remote: remote.to_string(),
            },
        );
        Link {
            ipv4_subnet: subnet.to_string(),
            environments,
        }
    }

    fn topology(entries: &[(&str, &str, Link)]) -> Topology {
        let mut t = Topology::new();
        for (spine, leaf, l) in entries {
            t.entry(spine.to_string())
                .or_default()
                .entry(leaf.to_string())
                .or_default()
                .push(l.clone());
        }
        t
    }

    #[test]
    fn usable_range_edges() {
        let p2p: Ipv4Net = "10.0.0.0/31".parse().unwrap();
        assert_eq!(
            usable_range(&p2p),
            Some((Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(10, 0, 0, 1)))
        );
        let block: Ipv4Net = "10.0.0.8/29".parse().unwrap();
        assert_eq!(
            usable_range(&block),
            Some((Ipv4Addr::new(10, 0, 0, 9), Ipv4Addr::new(10, 0, 0, 14)))
        );
        let host: Ipv4Net = "10.0.0.1/32".parse().unwrap();
        assert_eq!(usable_range(&host), None);
    }

    #[test]
    fn spine_gets_first_and_leaf_gets_last_address() {
        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.0/30", "Ethernet1", "Ethernet49"))]);
        let ipam = plan(&t, "lab").unwrap();

        let spine_side = &ipam["spine-1"]["leaf-1"];
        assert_eq!(spine_side.my_ip, "10.0.0.1/30");
        assert_eq!(spine_side.peer_ip, "10.0.0.2/30");
        assert_eq!(spine_side.my_intf, "Ethernet1");
        assert_eq!(spine_side.peer_intf, "Ethernet49");

        let leaf_side = &ipam["leaf-1"]["spine-1"];
        assert_eq!(leaf_side.my_ip, "10.0.0.2/30");
        assert_eq!(leaf_side.peer_ip, "10.0.0.1/30");
        assert_eq!(leaf_side.my_intf, "Ethernet49");
        assert_eq!(leaf_side.peer_intf, "Ethernet1");
    }

    #[test]
    fn plan_is_symmetric_across_the_fabric() {
        let t = topology(&[
            ("spine-1", "leaf-1", link("10.0.1.0/31", "Ethernet1", "Ethernet1")),
            ("spine-1", "leaf-2", link("10.0.1.2/31", "Ethernet2", "Ethernet1")),
            ("spine-2", "leaf-1", link("10.0.2.0/31", "Ethernet1", "Ethernet2")),
            ("spine-2", "leaf-2", link("10.0.2.2/31", "Ethernet2", "Ethernet2")),
        ]);
        let ipam = plan(&t, "lab").unwrap();
        assert_eq!(ipam.len(), 4);

        for (node, peers) in &ipam {
            for (peer, rec) in peers {
                let mirror = &ipam[peer][node];
                assert_eq!(rec.my_ip, mirror.peer_ip);
                assert_eq!(rec.peer_ip, mirror.my_ip);
                assert_eq!(rec.my_intf, mirror.peer_intf);
                assert_eq!(rec.peer_intf, mirror.my_intf);

                let mine: Ipv4Net = rec.my_ip.parse().unwrap();
                let theirs: Ipv4Net = rec.peer_ip.parse().unwrap();
                assert_eq!(mine.trunc(), theirs.trunc());
                assert_eq!(mine.prefix_len(), theirs.prefix_len());
            }
        }
    }

    #[test]
    fn host_bits_in_subnet_are_ignored() {
        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.5/30", "e1", "e2"))]);
        let ipam = plan(&t, "lab").unwrap();
        assert_eq!(ipam["spine-1"]["leaf-1"].my_ip, "10.0.0.5/30");
        assert_eq!(ipam["leaf-1"]["spine-1"].my_ip, "10.0.0.6/30");
    }

    #[test]
    fn rejects_malformed_and_tiny_subnets() {
        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.300/31", "e1", "e2"))]);
        assert!(matches!(
            plan(&t, "lab"),
            Err(AddressPlanningError::MalformedSubnet { .. })
        ));

        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.0", "e1", "e2"))]);
        assert!(matches!(
            plan(&t, "lab"),
            Err(AddressPlanningError::MalformedSubnet { .. })
        ));

        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.7/32", "e1", "e2"))]);
        assert_eq!(
            plan(&t, "lab"),
            Err(AddressPlanningError::TooFewHosts {
                subnet: "10.0.0.7/32".to_string()
            })
        );
    }

    #[test]
    fn missing_environment_is_an_error() {
        let t = topology(&[("spine-1", "leaf-1", link("10.0.0.0/31", "e1", "e2"))]);
        assert_eq!(
            plan(&t, "prod"),
            Err(AddressPlanningError::MissingEnvironment {
                spine: "spine-1".to_string(),
                leaf: "leaf-1".to_string(),
                env: "prod".to_string(),
            })
        );
    }

    #[test]
    fn overlapping_subnets_are_rejected() {
        let t = topology(&[
            ("spine-1", "leaf-1", link("10.0.0.0/30", "e1", "e1")),
            ("spine-1", "leaf-2", link("10.0.0.2/31", "e2", "e1")),
        ]);
        match plan(&t, "lab") {
            Err(AddressPlanningError::SubnetReused { first, second, .. }) => {
                assert_eq!(first, "spine-1<->leaf-1");
                assert_eq!(second, "spine-1<->leaf-2");
            }
            other => panic!("expected overlap error, got {:?}", other),
        }
    }

    #[test]
    fn params_load_from_yaml_group_vars() {
        let tmp = TempDir::new().expect("temp dir");
        let path = tmp.path().join("clos.yml");
        std::fs::write(
            &path,
            "env: lab\n\
             clos:\n  \
               spine-1:\n    \
                 leaf-1:\n      \
                   - ipv4_subnet: 10.0.0.0/31\n        \
                     lab: {local: Ethernet1, remote: Ethernet49}\n        \
                     prod: {local: Ethernet1/1, remote: Ethernet49/1}\n",
        )
        .unwrap();

        let params = load_params(&path).unwrap();
        assert_eq!(params.env, "lab");
        let l = &params.clos["spine-1"]["leaf-1"][0];
        assert_eq!(l.ipv4_subnet, "10.0.0.0/31");
        assert_eq!(l.environments["prod"].local, "Ethernet1/1");
    }
}
