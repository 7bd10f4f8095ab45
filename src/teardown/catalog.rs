use anyhow::{bail, Result};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

use super::report::Deleted;
use super::services::CloudServices;
use crate::aws::{classify, AwsError, ErrorKind, QueryContext, QueryState};
use crate::config::{Config, QueryWait};

/// Backtick-quote an identifier for Athena DDL
pub fn quote_identifier(name: &str) -> Result<String> {
    if name.is_empty() {
        bail!("Empty identifier");
    }
    if name.contains('`') {
        bail!("Identifier '{}' contains a backtick", name);
    }
    Ok(format!("`{}`", name))
}

pub fn drop_table_sql(table: &str) -> Result<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", quote_identifier(table)?))
}

pub fn drop_database_sql(database: &str) -> Result<String> {
    Ok(format!("DROP DATABASE IF EXISTS {}", quote_identifier(database)?))
}

/// Poll a submitted query until it reaches a terminal state or `wait.timeout` elapses
pub fn wait_for_query(
    services: &dyn CloudServices,
    query_id: &str,
    wait: &QueryWait,
) -> Result<QueryState> {
    let started = Instant::now();
    loop {
        let state = services.query_state(query_id)?;
        if state.is_terminal() {
            return Ok(state);
        }
        if started.elapsed() >= wait.timeout {
            return Err(AwsError::new(
                ErrorKind::Transient,
                "athena get-query-execution",
                format!(
                    "query {} still {:?} after {} seconds",
                    query_id,
                    state,
                    wait.timeout.as_secs()
                ),
            )
            .into());
        }
        thread::sleep(wait.poll_interval);
    }
}

/// Submit one DDL statement and wait for it to succeed
pub fn run_ddl(
    services: &dyn CloudServices,
    sql: &str,
    context: &QueryContext,
    output_location: &str,
    wait: &QueryWait,
) -> Result<()> {
    let query_id = services.start_query(sql, context, output_location)?;
    debug!(query_id = %query_id, sql, "query submitted");
    match wait_for_query(services, &query_id, wait)? {
        QueryState::Succeeded => Ok(()),
        QueryState::Failed(reason) => Err(AwsError::new(
            classify(&reason),
            "athena query",
            format!("{} failed: {}", sql, reason),
        )
        .into()),
        QueryState::Cancelled => Err(AwsError::new(
            ErrorKind::Other,
            "athena query",
            format!("{} was cancelled", sql),
        )
        .into()),
        state => bail!("query {} returned non-terminal state {:?}", query_id, state),
    }
}

/// Drop every table in the configured database, then the database itself.
/// Listing fails with NotFound when the database does not exist.
pub fn drop_database_with_tables(
    services: &dyn CloudServices,
    config: &Config,
    deleted: &mut Vec<Deleted>,
) -> Result<()> {
    let database = &config.athena_database_name;
    let drop_database = drop_database_sql(database)?;
    let output = config.athena_output_location();

    let tables = services.list_table_names(&config.catalog, database)?;
    debug!(database = %database, count = tables.len(), "tables listed");

    let statements = tables
        .into_iter()
        .map(|table| -> Result<(String, String)> { Ok((drop_table_sql(&table)?, table)) })
        .collect::<Result<Vec<_>>>()?;

    let table_context = QueryContext {
        catalog: config.catalog.clone(),
        database: Some(database.clone()),
    };
    for (sql, table) in statements {
        run_ddl(services, &sql, &table_context, &output, &config.query_wait)?;
        info!(database = %database, table = %table, "table dropped");
        deleted.push(Deleted::Table {
            database: database.clone(),
            table,
        });
    }

    let catalog_context = QueryContext {
        catalog: config.catalog.clone(),
        database: None,
    };
    run_ddl(
        services,
        &drop_database,
        &catalog_context,
        &output,
        &config.query_wait,
    )?;
    info!(database = %database, "database dropped");
    deleted.push(Deleted::Database(database.clone()));
    Ok(())
}
