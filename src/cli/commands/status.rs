use anyhow::Result;
use tracing::debug;

use crate::aws::{require_aws_cli, AwsCli};
use crate::cli::StatusArgs;
use crate::config::Config;
use crate::teardown::inventory;

pub fn execute_status(args: StatusArgs, path: &str) -> Result<()> {
    let config = Config::load(path)?.with_region(args.region);
    debug!(import_path = %config.import_path, "config loaded");
    require_aws_cli()?;

    let cli = AwsCli::new(&config.region);
    let account = cli.sts().get_caller_identity()?;

    eprintln!("==> text2sql demo resources");
    eprintln!("    Account: {}", account.account_id);
    eprintln!("    Region:  {}", config.region);
    eprintln!();

    let resources = inventory(&cli, &config)?;
    for resource in &resources {
        eprintln!(
            "    {:<16} {:<10} {:<40} {}",
            resource.step.name(),
            resource.kind,
            resource.name,
            if resource.exists { "exists" } else { "absent" }
        );
    }

    let remaining = resources.iter().filter(|r| r.exists).count();
    eprintln!();
    if remaining == 0 {
        eprintln!("==> All demo resources are deleted");
    } else if remaining < resources.len() {
        eprintln!(
            "==> Partially torn down: {} of {} resources remain",
            remaining,
            resources.len()
        );
    } else {
        eprintln!("==> All demo resources exist");
    }

    Ok(())
}
