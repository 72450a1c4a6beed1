use clap::Parser;

mod cli;
mod commands;
mod domain;
mod oracle;
mod services;
mod test_helpers;

pub use cli::*;
pub use commands::*;
pub use domain::models::*;
pub use domain::topology::*;
pub use oracle::{HttpOracle, OracleError, ReplayOracle, SnapshotOracle};
pub use services::address_plan::{load_params, plan, AddressPlanningError};
pub use services::config_sanity::run_config_sanity;
pub use services::control_plane::run_control_plane;
pub use services::data_plane::run_data_plane;
pub use services::differential::analyze_failure;
pub use services::logging::init_logging;
pub use services::output::{print_error, print_report};
pub use services::report::build_report;
pub use services::settings::{load_settings, SettingsError};
pub use std::process::ExitCode;

fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<OracleError>().is_some() {
        "ORACLE_ERROR"
    } else if err.downcast_ref::<AddressPlanningError>().is_some() {
        "ADDRESS_PLANNING_ERROR"
    } else if err.downcast_ref::<SettingsError>().is_some() {
        "CONFIG_ERROR"
    } else {
        "INTERNAL_ERROR"
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings(cli.config.as_deref())?;

    if let Some(code) = handle_plan_command(cli)? {
        return Ok(code);
    }
    if let Some(code) = handle_verify_command(cli, &settings)? {
        return Ok(code);
    }
    anyhow::bail!("unhandled command")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log.as_deref()) {
        print_error(cli.json, "INTERNAL_ERROR", &e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            let code = error_code(&e);
            tracing::error!(code, "{:#}", e);
            print_error(cli.json, code, &e);
            ExitCode::FAILURE
        }
    }
}
