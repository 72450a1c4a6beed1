use super::{
    BgpSessionRow, FlowHeader, FlowRow, IpOwnerRow, NodeRow, OracleError, SnapshotHandle,
    SnapshotOracle, StructureRow, Trace,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct Answer<T> {
    #[serde(default = "Vec::new")]
    rows: Vec<T>,
}

#[derive(Deserialize)]
struct TracerouteRow {
    #[serde(rename = "Traces", default)]
    traces: Vec<Trace>,
}

fn looks_like_url(host: &str) -> bool {
    host.starts_with("http://") || host.starts_with("https://")
}

pub fn base_url(host: &str, port: u16) -> String {
    if looks_like_url(host) {
        host.trim_end_matches('/').to_string()
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Talks to a network-model service. One blocking request per question.
pub struct HttpOracle {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpOracle {
    pub fn connect(host: &str, port: u16, timeout_ms: u64) -> Result<Self, OracleError> {
        let base = base_url(host, port);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|source| OracleError::Unreachable {
                url: base.clone(),
                source,
            })?;
        Ok(Self { client, base })
    }

    fn post(&self, question: &str, url: String, body: &Value) -> Result<String, OracleError> {
        debug!(%url, question, "oracle request");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|source| OracleError::Unreachable {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        let text = resp.text().map_err(|source| OracleError::Unreachable {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(OracleError::Rejected {
                question: question.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn ask<T: DeserializeOwned>(
        &self,
        snapshot: &SnapshotHandle,
        question: &str,
        params: Value,
    ) -> Result<Vec<T>, OracleError> {
        let url = format!(
            "{}/v1/snapshots/{}/questions/{}",
            self.base,
            snapshot.name(),
            question
        );
        let text = self.post(question, url, &params)?;
        let answer: Answer<T> =
            serde_json::from_str(&text).map_err(|e| OracleError::MalformedAnswer {
                question: question.to_string(),
                reason: e.to_string(),
            })?;
        debug!(question, rows = answer.rows.len(), "oracle answer");
        Ok(answer.rows)
    }
}

impl SnapshotOracle for HttpOracle {
    fn load_snapshot(&mut self, path: &Path, name: &str) -> Result<SnapshotHandle, OracleError> {
        let path = path.canonicalize().map_err(|source| OracleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let url = format!("{}/v1/snapshots", self.base);
        let body = json!({"name": name, "path": path.to_string_lossy()});
        self.post("loadSnapshot", url, &body)?;
        Ok(SnapshotHandle::new(name))
    }

    fn node_properties(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<NodeRow>, OracleError> {
        self.ask(snapshot, "nodeProperties", json!({"nodes": nodes}))
    }

    fn bgp_session_status(
        &self,
        snapshot: &SnapshotHandle,
        nodes: &str,
    ) -> Result<Vec<BgpSessionRow>, OracleError> {
        self.ask(snapshot, "bgpSessionStatus", json!({"nodes": nodes}))
    }

    fn ip_owners(&self, snapshot: &SnapshotHandle) -> Result<Vec<IpOwnerRow>, OracleError> {
        self.ask(snapshot, "ipOwners", json!({}))
    }

    fn traceroute(
        &self,
        snapshot: &SnapshotHandle,
        start_location: &str,
        header: &FlowHeader,
    ) -> Result<Vec<Trace>, OracleError> {
        let rows: Vec<TracerouteRow> = self.ask(
            snapshot,
            "traceroute",
            json!({"startLocation": start_location, "headers": header}),
        )?;
        Ok(rows.into_iter().next().map(|r| r.traces).unwrap_or_default())
    }

    fn undefined_references(
        &self,
        snapshot: &SnapshotHandle,
    ) -> Result<Vec<StructureRow>, OracleError> {
        self.ask(snapshot, "undefinedReferences", json!({}))
    }

    fn unused_structures(
        &self,
        snapshot: &SnapshotHandle,
    ) -> Result<Vec<StructureRow>, OracleError> {
        self.ask(snapshot, "unusedStructures", json!({}))
    }

    fn reachability_diff(
        &self,
        snapshot: &SnapshotHandle,
        reference: &SnapshotHandle,
    ) -> Result<Vec<FlowRow>, OracleError> {
        self.ask(
            snapshot,
            "reducedReachability",
            json!({"reference_snapshot": reference.name()}),
        )
    }
}
