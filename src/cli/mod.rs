pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_FILENAME;
use crate::teardown::TeardownStep;

#[derive(Parser)]
#[command(name = "text2sql-teardown")]
#[command(about = "Tear down the text2sql demo resources on AWS")]
#[command(version)]
pub struct Cli {
    /// Path to the stored variables written by the setup step
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the stored variables file
    Init(InitArgs),
    /// Delete the agent, Athena database, buckets and Lambda function
    Destroy(DestroyArgs),
    /// Show which demo resources still exist
    Status(StatusArgs),
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// AWS region the demo was deployed to
    #[arg(long, env = "AWS_REGION")]
    pub region: String,

    /// Bucket holding the demo data
    #[arg(long = "base-bucket", env = "BASE_BUCKET_NAME")]
    pub base_bucket_name: String,

    /// Bucket Athena writes query results to
    #[arg(long = "results-bucket", env = "ATHENA_RESULTS_BUCKET_NAME")]
    pub athena_results_bucket_name: String,

    /// Athena (Glue) database name
    #[arg(long = "database", env = "ATHENA_DATABASE_NAME")]
    pub athena_database_name: String,

    /// Lambda function backing the agent's action group
    #[arg(long = "function", env = "TEXT2SQL_LAMBDA_FUNCTION_NAME")]
    pub text2sql_lambda_function_name: String,

    /// Directory the setup step ran from
    #[arg(long, env = "TEXT2SQL_IMPORT_PATH")]
    pub import_path: String,

    /// Bedrock agent name
    #[arg(long)]
    pub agent_name: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct DestroyArgs {
    /// Override the stored region
    #[arg(long)]
    pub region: Option<String>,

    /// Run only these steps (repeatable)
    #[arg(long = "step", value_name = "STEP", conflicts_with = "resume_from")]
    pub steps: Vec<TeardownStep>,

    /// Run this step and every later one
    #[arg(long, value_name = "STEP")]
    pub resume_from: Option<TeardownStep>,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Override the stored region
    #[arg(long)]
    pub region: Option<String>,
}
