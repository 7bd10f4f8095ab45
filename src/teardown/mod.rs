//! Ordered teardown of the text2sql demo resources.
//!
//! Every step talks to the cloud through [`CloudServices`], so the same
//! sequence runs against the aws CLI in production and an in-memory fake in
//! tests. Steps run strictly one after another; a failed step is recorded
//! and the run moves on to the next independent step.

mod agent;
mod catalog;
mod function;
mod plan;
mod report;
mod services;
mod storage;

pub use agent::delete_agent;
pub use catalog::{
    drop_database_sql, drop_database_with_tables, drop_table_sql, quote_identifier, run_ddl,
    wait_for_query,
};
pub use function::delete_function;
pub use plan::{TeardownPlan, TeardownStep};
pub use report::{Deleted, StepOutcome, StepStatus, TeardownReport};
pub use services::CloudServices;
pub use storage::empty_and_delete_bucket;

use anyhow::Result;
use tracing::{info, warn};

use crate::aws::error_kind;
use crate::config::Config;

fn run_step(
    services: &dyn CloudServices,
    config: &Config,
    step: TeardownStep,
    deleted: &mut Vec<Deleted>,
) -> Result<()> {
    match step {
        TeardownStep::Agent => delete_agent(services, &config.agent_name, true, deleted),
        TeardownStep::Catalog => drop_database_with_tables(services, config, deleted),
        TeardownStep::BaseBucket => {
            empty_and_delete_bucket(services, &config.base_bucket_name, deleted)
        }
        TeardownStep::ResultsBucket => {
            empty_and_delete_bucket(services, &config.athena_results_bucket_name, deleted)
        }
        TeardownStep::Function => {
            delete_function(services, &config.text2sql_lambda_function_name, deleted)
        }
    }
}

/// Run the selected steps in order and report what happened to each
pub fn run_teardown(
    services: &dyn CloudServices,
    config: &Config,
    plan: &TeardownPlan,
) -> TeardownReport {
    let mut report = TeardownReport::default();

    for &step in plan.steps() {
        let blocked_by = step
            .depends_on()
            .filter(|dep| report.outcome(*dep).is_some_and(|o| o.is_failed()));
        if let Some(dep) = blocked_by {
            warn!(step = %step, depends_on = %dep, "step skipped");
            report.outcomes.push(StepOutcome {
                step,
                status: StepStatus::Skipped {
                    reason: format!("'{}' failed earlier in this run", dep),
                },
                deleted: Vec::new(),
            });
            continue;
        }

        let mut deleted = Vec::new();
        let status = match run_step(services, config, step, &mut deleted) {
            Ok(()) => {
                info!(step = %step, deleted = deleted.len(), "step completed");
                StepStatus::Completed
            }
            Err(e) => {
                let kind = error_kind(&e);
                warn!(step = %step, kind = %kind, error = %e, "step failed");
                StepStatus::Failed {
                    kind,
                    message: format!("{:#}", e),
                }
            }
        };
        report.outcomes.push(StepOutcome {
            step,
            status,
            deleted,
        });
    }

    report
}

/// Presence of one demo resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    pub step: TeardownStep,
    pub kind: &'static str,
    pub name: String,
    pub exists: bool,
}

/// Check which demo resources still exist
pub fn inventory(services: &dyn CloudServices, config: &Config) -> Result<Vec<ResourceStatus>> {
    let status = |step, kind, name: &str, exists| ResourceStatus {
        step,
        kind,
        name: name.to_string(),
        exists,
    };
    Ok(vec![
        status(
            TeardownStep::Agent,
            "agent",
            &config.agent_name,
            services.find_agent_id(&config.agent_name)?.is_some(),
        ),
        status(
            TeardownStep::Catalog,
            "database",
            &config.athena_database_name,
            services.database_exists(&config.athena_database_name)?,
        ),
        status(
            TeardownStep::BaseBucket,
            "bucket",
            &config.base_bucket_name,
            services.bucket_exists(&config.base_bucket_name)?,
        ),
        status(
            TeardownStep::ResultsBucket,
            "bucket",
            &config.athena_results_bucket_name,
            services.bucket_exists(&config.athena_results_bucket_name)?,
        ),
        status(
            TeardownStep::Function,
            "function",
            &config.text2sql_lambda_function_name,
            services.function_exists(&config.text2sql_lambda_function_name)?,
        ),
    ])
}
