use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CANDIDATE_DIR: &str = "./candidate";
pub const DEFAULT_FAILURE_DIR: &str = "./candidate-with-failure";

#[derive(Parser, Debug)]
#[command(
    name = "clos-verify",
    version,
    about = "Addressing and invariant checks for spine/leaf fabrics"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Append INFO logs to this file; the console only shows errors"
    )]
    pub log: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "TOML config file (default: ./clos-verify.toml when present)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run config sanity, control plane and data plane suites, then the failure analysis.
    Verify(VerifyArgs),
    /// Derive the point-to-point addressing plan for a CLOS topology.
    Plan {
        #[arg(help = "JSON or YAML file with `clos` and `env`")]
        params: PathBuf,
        #[arg(long, help = "Build environment, overrides `env` from the file")]
        env: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(long, help = "IP/host (or URL) of the network model service")]
    pub host: Option<String>,
    #[arg(
        long,
        default_value = DEFAULT_CANDIDATE_DIR,
        help = "Directory with the candidate device configurations"
    )]
    pub candidate: PathBuf,
    #[arg(
        long,
        default_value = DEFAULT_FAILURE_DIR,
        help = "Directory with the candidate configurations plus injected failure"
    )]
    pub failure: PathBuf,
    #[arg(long, help = "Leaf the traceroutes start from")]
    pub source_node: Option<String>,
    #[arg(long, default_value_t = false, help = "Skip the path count == spine count check")]
    pub no_multipath: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Answer from recorded .oracle/answers.json files instead of a live service"
    )]
    pub replay: bool,
}
