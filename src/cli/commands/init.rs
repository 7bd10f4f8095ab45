use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::InitArgs;
use crate::config::{Config, QueryWait, DEFAULT_AGENT_NAME, DEFAULT_CATALOG};

pub fn execute_init(args: InitArgs, path: &str) -> Result<()> {
    if Path::new(path).exists() && !args.force {
        bail!("{} already exists. Use --force to overwrite.", path);
    }

    let config = Config {
        import_path: args.import_path,
        region: args.region,
        base_bucket_name: args.base_bucket_name,
        athena_results_bucket_name: args.athena_results_bucket_name,
        athena_database_name: args.athena_database_name,
        text2sql_lambda_function_name: args.text2sql_lambda_function_name,
        agent_name: args
            .agent_name
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
        catalog: DEFAULT_CATALOG.to_string(),
        query_wait: QueryWait::default(),
    };

    config.save(path)?;

    eprintln!("Created {}", path);
    eprintln!("  region: {}", config.region);
    eprintln!("  agent: {}", config.agent_name);
    eprintln!("  database: {}", config.athena_database_name);
    eprintln!("  buckets: {}, {}", config.base_bucket_name, config.athena_results_bucket_name);
    eprintln!("  function: {}", config.text2sql_lambda_function_name);
    eprintln!();
    eprintln!("Next: text2sql-teardown destroy");

    Ok(())
}
