#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub candidate: PathBuf,
    pub failure: PathBuf,
}

impl TestEnv {
    /// Candidate and failure snapshots with recorded oracle answers.
    pub fn new(candidate: Value, failure: Value) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let candidate_dir = write_snapshot(&root, "candidate", &candidate);
        let failure_dir = write_snapshot(&root, "candidate-with-failure", &failure);
        Self {
            _tmp: tmp,
            root,
            candidate: candidate_dir,
            failure: failure_dir,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("clos-verify");
        cmd.current_dir(&self.root).env_remove("RUST_LOG");
        cmd
    }

    pub fn verify_args(&self) -> Vec<String> {
        vec![
            "verify".to_string(),
            "--replay".to_string(),
            "--candidate".to_string(),
            self.candidate.to_string_lossy().to_string(),
            "--failure".to_string(),
            self.failure.to_string_lossy().to_string(),
        ]
    }

    /// Runs `verify --json` and returns (exit code, parsed stdout).
    pub fn verify_json(&self, extra: &[&str]) -> (i32, Value) {
        let out = self
            .cmd()
            .arg("--json")
            .args(self.verify_args())
            .args(extra)
            .output()
            .expect("run clos-verify");
        let code = out.status.code().expect("exit code");
        let value = serde_json::from_slice(&out.stdout).expect("valid json output");
        (code, value)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write file");
        path
    }
}

fn write_snapshot(base: &Path, name: &str, answers: &Value) -> PathBuf {
    let dir = base.join(name);
    fs::create_dir_all(dir.join("configs")).expect("create configs dir");
    fs::create_dir_all(dir.join(".oracle")).expect("create .oracle");
    fs::write(dir.join("configs/leaf-3.cfg"), "hostname leaf-3\n").expect("write config");
    fs::write(
        dir.join(".oracle/answers.json"),
        serde_json::to_string_pretty(answers).expect("serialize answers"),
    )
    .expect("write answers");
    dir
}

fn traces(paths: usize, disposition: &str) -> Value {
    let spines = ["spine-1", "spine-2"];
    Value::Array(
        (0..paths)
            .map(|i| {
                json!({
                    "disposition": disposition,
                    "hops": [{"node": "leaf-3"}, {"node": spines[i % 2]}]
                })
            })
            .collect(),
    )
}

/// Two spines, three leaves, `leaf-3` as the traceroute source.
/// `paths` controls how many equal-cost paths every leaf-to-leaf trace has.
pub fn fabric_answers(paths: usize, disposition: &str) -> Value {
    json!({
        "node_properties": [
            {"Node": "spine-1"}, {"Node": "spine-2"},
            {"Node": "leaf-1"}, {"Node": "leaf-2"}, {"Node": "leaf-3"}
        ],
        "bgp_sessions": [
            {"Node": "leaf-1", "Remote_Node": "spine-1"},
            {"Node": "leaf-1", "Remote_Node": "spine-2"},
            {"Node": "leaf-2", "Remote_Node": "spine-1"},
            {"Node": "leaf-2", "Remote_Node": "spine-2"},
            {"Node": "leaf-3", "Remote_Node": "spine-1"},
            {"Node": "leaf-3", "Remote_Node": "spine-2"},
            {"Node": "spine-1", "Remote_Node": "leaf-1"}
        ],
        "ip_owners": [
            {"Node": "spine-1", "Interface": "Loopback0", "IP": "10.0.255.1", "Active": true},
            {"Node": "spine-2", "Interface": "Loopback0", "IP": "10.0.255.2", "Active": true},
            {"Node": "leaf-1", "Interface": "Loopback0", "IP": "10.0.255.11", "Active": true},
            {"Node": "leaf-2", "Interface": "Loopback0", "IP": "10.0.255.12", "Active": true},
            {"Node": "leaf-3", "Interface": "Loopback0", "IP": "10.0.255.13", "Active": true},
            {"Node": "leaf-3", "Interface": "Ethernet1", "IP": "10.0.0.1", "Active": true}
        ],
        "traceroutes": [
            {"start_location": "leaf-3", "src_ip": "10.0.255.13", "dst_ip": "10.0.255.11",
             "traces": traces(paths, disposition)},
            {"start_location": "leaf-3", "src_ip": "10.0.255.13", "dst_ip": "10.0.255.12",
             "traces": traces(paths, disposition)}
        ],
        "undefined_references": [],
        "unused_structures": []
    })
}

pub fn healthy() -> Value {
    fabric_answers(2, "ACCEPTED")
}

/// One spine isolated: every flow still gets through, on a single path.
pub fn spine_down() -> Value {
    fabric_answers(1, "ACCEPTED")
}

pub fn topology_params() -> Value {
    json!({
        "env": "lab",
        "clos": {
            "spine-1": {
                "leaf-1": [{"ipv4_subnet": "10.0.1.0/31",
                            "lab": {"local": "Ethernet1", "remote": "Ethernet1"},
                            "prod": {"local": "Ethernet1/1", "remote": "Ethernet49/1"}}],
                "leaf-2": [{"ipv4_subnet": "10.0.1.2/31",
                            "lab": {"local": "Ethernet2", "remote": "Ethernet1"},
                            "prod": {"local": "Ethernet2/1", "remote": "Ethernet49/1"}}]
            },
            "spine-2": {
                "leaf-1": [{"ipv4_subnet": "10.0.2.0/31",
                            "lab": {"local": "Ethernet1", "remote": "Ethernet2"},
                            "prod": {"local": "Ethernet1/1", "remote": "Ethernet50/1"}}],
                "leaf-2": [{"ipv4_subnet": "10.0.2.2/31",
                            "lab": {"local": "Ethernet2", "remote": "Ethernet2"},
                            "prod": {"local": "Ethernet2/1", "remote": "Ethernet50/1"}}]
            }
        }
    })
}
