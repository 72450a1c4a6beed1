use crate::*;

pub fn handle_plan_command(cli: &Cli) -> anyhow::Result<Option<ExitCode>> {
    let Commands::Plan { params, env } = &cli.command else {
        return Ok(None);
    };

    let loaded = load_params(params)?;
    let env = env.clone().unwrap_or(loaded.env);

    match plan(&loaded.clos, &env) {
        Ok(ipam) => {
            let out = PlanOut {
                changed: false,
                ansible_facts: PlanFacts { ipam },
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(Some(ExitCode::SUCCESS))
        }
        Err(e) => {
            tracing::error!(error = %e, "address planning failed");
            let out = PlanFailure {
                failed: true,
                msg: e.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(Some(ExitCode::FAILURE))
        }
    }
}
