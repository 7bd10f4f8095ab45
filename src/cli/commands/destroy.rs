use anyhow::{bail, Result};
use tracing::debug;

use crate::aws::{require_aws_cli, AwsCli};
use crate::cli::DestroyArgs;
use crate::config::{Config, CONFIG_FILENAME};
use crate::teardown::{run_teardown, StepStatus, TeardownPlan, TeardownReport};

pub fn execute_destroy(args: DestroyArgs, path: &str) -> Result<()> {
    let config = Config::load(path)?.with_region(args.region);
    debug!(import_path = %config.import_path, "config loaded");
    let plan = TeardownPlan::select(&args.steps, args.resume_from)?;

    require_aws_cli()?;
    let cli = AwsCli::new(&config.region);
    let account = cli.sts().get_caller_identity()?;

    eprintln!("==> Tearing down text2sql demo");
    eprintln!("    Account:  {}", account.account_id);
    eprintln!("    Caller:   {}", account.caller_arn);
    eprintln!("    Region:   {}", config.region);
    eprintln!("    Agent:    {}", config.agent_name);
    eprintln!("    Database: {}", config.athena_database_name);
    eprintln!(
        "    Buckets:  {}, {}",
        config.base_bucket_name, config.athena_results_bucket_name
    );
    eprintln!("    Function: {}", config.text2sql_lambda_function_name);
    let names: Vec<_> = plan.steps().iter().map(|s| s.name()).collect();
    eprintln!("    Steps:    {}", names.join(", "));

    let report = run_teardown(&cli, &config, &plan);
    print_report(&report, path);

    if !report.is_success() {
        bail!(
            "Teardown incomplete: {} step(s) failed, {} skipped. Resources may be partially deleted.",
            report.failed().count(),
            report.skipped().count()
        );
    }

    eprintln!("\n==> Done");
    Ok(())
}

fn print_report(report: &TeardownReport, path: &str) {
    for outcome in &report.outcomes {
        eprintln!("\n==> {}", outcome.step);
        for deleted in &outcome.deleted {
            eprintln!("    Deleted {}", deleted);
        }
        match &outcome.status {
            StepStatus::Completed => {}
            StepStatus::Failed { kind, message } => {
                eprintln!("    Failed ({}): {}", kind, message);
            }
            StepStatus::Skipped { reason } => eprintln!("    Skipped: {}", reason),
        }
    }

    let incomplete = report.incomplete_steps();
    if !incomplete.is_empty() {
        eprintln!(
            "\n==> WARNING: {} step(s) failed and {} were skipped:",
            report.failed().count(),
            report.skipped().count()
        );
        for outcome in report.failed().chain(report.skipped()) {
            eprintln!("    - {}", outcome.step);
        }
        let mut flags: Vec<_> = incomplete
            .iter()
            .map(|step| format!("--step {}", step))
            .collect();
        if path != CONFIG_FILENAME {
            flags.insert(0, format!("--config {}", path));
        }
        eprintln!();
        eprintln!("    Fix the cause, then re-run only the remaining steps:");
        eprintln!("      text2sql-teardown destroy {}", flags.join(" "));
    }
}
