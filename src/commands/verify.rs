use crate::*;

fn fabric_for(args: &VerifyArgs, settings: &Settings) -> FabricSettings {
    let mut fabric = settings.fabric.clone();
    if let Some(source) = &args.source_node {
        fabric.source_node = source.clone();
    }
    if args.no_multipath {
        fabric.check_multipath = false;
    }
    fabric
}

fn open_oracle(args: &VerifyArgs, settings: &Settings) -> anyhow::Result<Box<dyn SnapshotOracle>> {
    if args.replay {
        return Ok(Box::new(ReplayOracle::new()));
    }
    let host = args.host.as_deref().unwrap_or(&settings.oracle.host);
    Ok(Box::new(HttpOracle::connect(
        host,
        settings.oracle.port,
        settings.oracle.timeout_ms,
    )?))
}

pub fn handle_verify_command(cli: &Cli, settings: &Settings) -> anyhow::Result<Option<ExitCode>> {
    let Commands::Verify(args) = &cli.command else {
        return Ok(None);
    };

    let fabric = fabric_for(args, settings);
    let mut oracle = open_oracle(args, settings)?;

    let candidate = oracle.load_snapshot(&args.candidate, "candidate")?;
    let failure = oracle.load_snapshot(&args.failure, "failure")?;

    // Every candidate suite finishes before the failure snapshot is queried.
    let mut suites = vec![
        run_config_sanity(oracle.as_ref(), &candidate)?,
        run_control_plane(oracle.as_ref(), &candidate, &fabric)?,
        run_data_plane(oracle.as_ref(), &candidate, &fabric)?,
    ];

    let analysis = analyze_failure(oracle.as_ref(), &candidate, &failure, &fabric)?;
    suites.push(analysis.data_plane);

    let report = build_report(suites, analysis.regressions);
    print_report(cli.json, &report)?;

    Ok(Some(if report.overall_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }))
}
