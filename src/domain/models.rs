use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ORACLE_PORT: u16 = 9996;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_ORACLE_PORT
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_source_node() -> String {
    "leaf-3".to_string()
}

fn default_spine_nodes() -> String {
    "spine.*".to_string()
}

fn default_leaf_nodes() -> String {
    "leaf.*".to_string()
}

fn default_spine_marker() -> String {
    "spine".to_string()
}

fn default_leaf_marker() -> String {
    "leaf".to_string()
}

fn default_loopback_interface() -> String {
    "Loopback0".to_string()
}

fn default_expected_hops() -> usize {
    2
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonError {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Settings {
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub fabric: FabricSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OracleSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FabricSettings {
    #[serde(default = "default_source_node")]
    pub source_node: String,
    /// Node filter answering "which nodes are spines".
    #[serde(default = "default_spine_nodes")]
    pub spine_nodes: String,
    /// Node filter for the BGP session query.
    #[serde(default = "default_leaf_nodes")]
    pub leaf_nodes: String,
    #[serde(default = "default_spine_marker")]
    pub spine_marker: String,
    #[serde(default = "default_leaf_marker")]
    pub leaf_marker: String,
    #[serde(default = "default_loopback_interface")]
    pub loopback_interface: String,
    #[serde(default = "default_expected_hops")]
    pub expected_hops: usize,
    #[serde(default = "default_true")]
    pub check_multipath: bool,
}

impl Default for FabricSettings {
    fn default() -> Self {
        Self {
            source_node: default_source_node(),
            spine_nodes: default_spine_nodes(),
            leaf_nodes: default_leaf_nodes(),
            spine_marker: default_spine_marker(),
            leaf_marker: default_leaf_marker(),
            loopback_interface: default_loopback_interface(),
            expected_hops: default_expected_hops(),
            check_multipath: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ConfigSanity,
    ControlPlane,
    Reachability,
    MultipathCount,
    PathLength,
    Loopback,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ConfigSanity => "config_sanity",
            Category::ControlPlane => "control_plane",
            Category::Reachability => "reachability",
            Category::MultipathCount => "multipath_count",
            Category::PathLength => "path_length",
            Category::Loopback => "loopback",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A finding recorded by a check.
///
/// Fields are only reachable through accessors; the builder methods consume
/// the value, so a violation cannot change once it sits in a [`SuiteOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    category: Category,
    severity: Severity,
    subject: String,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    evidence: Vec<String>,
}

impl Violation {
    pub fn new(category: Category, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Error,
            subject: subject.into(),
            detail: detail.into(),
            expected: None,
            actual: None,
            evidence: Vec::new(),
        }
    }

    pub fn with_counts(mut self, expected: usize, actual: usize) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn expected(&self) -> Option<usize> {
        self.expected
    }

    pub fn actual(&self) -> Option<usize> {
        self.actual
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    ConfigSanity,
    ControlPlane,
    DataPlane,
}

impl SuiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteKind::ConfigSanity => "config_sanity",
            SuiteKind::ControlPlane => "control_plane",
            SuiteKind::DataPlane => "data_plane",
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one suite against one snapshot. `failed` only ever flips to true.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteOutcome {
    suite: SuiteKind,
    snapshot: String,
    failed: bool,
    violations: Vec<Violation>,
}

impl SuiteOutcome {
    pub fn new(suite: SuiteKind, snapshot: impl Into<String>) -> Self {
        Self {
            suite,
            snapshot: snapshot.into(),
            failed: false,
            violations: Vec::new(),
        }
    }

    pub fn record(&mut self, violation: Violation) {
        self.failed = true;
        self.violations.push(violation);
    }

    pub fn suite(&self) -> SuiteKind {
        self.suite
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `suite@snapshot`, unique within one report.
    pub fn label(&self) -> String {
        format!("{}@{}", self.suite, self.snapshot)
    }
}

/// Informational: a flow that stops working once the failure is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReachabilityRegression {
    pub src_ip: String,
    pub dst_ip: String,
}

#[derive(Debug, Serialize)]
pub struct VerificationReport {
    pub overall: String,
    pub overall_failed: bool,
    pub failing_suites: Vec<String>,
    pub suites: Vec<SuiteOutcome>,
    pub regressions: Vec<ReachabilityRegression>,
}
