use crate::domain::models::{ErrorBody, JsonError, JsonOut, VerificationReport};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

pub fn print_report(json: bool, report: &VerificationReport) -> anyhow::Result<()> {
    print_one(json, !report.overall_failed, report, |r| {
        let mut lines = Vec::new();
        for s in &r.suites {
            lines.push(format!(
                "{}\t{}\t{}\t{}",
                s.suite(),
                s.snapshot(),
                if s.failed() { "fail" } else { "pass" },
                s.violations().len()
            ));
        }
        for reg in &r.regressions {
            lines.push(format!("regression\t{} -> {}", reg.src_ip, reg.dst_ip));
        }
        lines.push(format!("overall: {}", r.overall));
        lines.join("\n")
    })
}

pub fn print_error(json: bool, code: &str, err: &anyhow::Error) {
    if json {
        let out = JsonError {
            ok: false,
            error: ErrorBody {
                code: code.to_string(),
                message: format!("{:#}", err),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {:#}", err),
        }
    } else {
        eprintln!("error: {:#}", err);
    }
}
