use super::{run_json, AwsCli};
use anyhow::{bail, Result};
use serde::Deserialize;

pub struct AthenaCli<'a> {
    pub(super) aws: &'a AwsCli,
}

/// Page size for `list-table-metadata`
const TABLE_PAGE_SIZE: &str = "50";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListTableMetadataResponse {
    #[serde(default)]
    table_metadata_list: Vec<TableMetadata>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TableMetadata {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StartQueryResponse {
    query_execution_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetQueryExecutionResponse {
    query_execution: QueryExecution,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QueryExecution {
    status: QueryStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QueryStatus {
    state: String,
    state_change_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    Succeeded,
    Failed(String),
    Cancelled,
    Running,
    Queued,
}

impl QueryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueryState::Succeeded | QueryState::Failed(_) | QueryState::Cancelled
        )
    }

    fn parse(state: &str, reason: Option<String>) -> Result<Self> {
        match state {
            "SUCCEEDED" => Ok(QueryState::Succeeded),
            "FAILED" => Ok(QueryState::Failed(
                reason.unwrap_or_else(|| "unknown".to_string()),
            )),
            "CANCELLED" => Ok(QueryState::Cancelled),
            "RUNNING" => Ok(QueryState::Running),
            "QUEUED" => Ok(QueryState::Queued),
            other => bail!("Unknown query state: {}", other),
        }
    }
}

/// Catalog and optional database a query runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    pub catalog: String,
    pub database: Option<String>,
}

impl QueryContext {
    fn to_arg(&self) -> String {
        match &self.database {
            Some(db) => format!("Database={},Catalog={}", db, self.catalog),
            None => format!("Catalog={}", self.catalog),
        }
    }
}

impl AthenaCli<'_> {
    /// All table names in a database, in listing order
    pub fn list_table_names(&self, catalog: &str, database: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut cmd = self.aws.command("athena", "list-table-metadata");
            cmd.args([
                "--catalog-name",
                catalog,
                "--database-name",
                database,
                "--max-items",
                TABLE_PAGE_SIZE,
                "--output",
                "json",
            ]);
            if let Some(t) = &token {
                cmd.args(["--starting-token", t]);
            }
            let page: ListTableMetadataResponse = run_json(&mut cmd)?;
            names.extend(page.table_metadata_list.into_iter().map(|t| t.name));
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(names)
    }

    pub fn start_query_execution(
        &self,
        query: &str,
        context: &QueryContext,
        output_location: &str,
    ) -> Result<String> {
        let mut cmd = self.aws.command("athena", "start-query-execution");
        cmd.args([
            "--query-string",
            query,
            "--query-execution-context",
            &context.to_arg(),
            "--result-configuration",
            &format!("OutputLocation={}", output_location),
            "--output",
            "json",
        ]);
        let response: StartQueryResponse = run_json(&mut cmd)?;
        Ok(response.query_execution_id)
    }

    pub fn get_query_state(&self, query_id: &str) -> Result<QueryState> {
        let mut cmd = self.aws.command("athena", "get-query-execution");
        cmd.args(["--query-execution-id", query_id, "--output", "json"]);
        let response: GetQueryExecutionResponse = run_json(&mut cmd)?;
        let status = response.query_execution.status;
        QueryState::parse(&status.state, status.state_change_reason)
    }
}
