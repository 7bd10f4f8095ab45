#![allow(dead_code)] // Test helpers appear unused when compiled independently


use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use text2sql_teardown::aws::{AwsError, ErrorKind, QueryContext, QueryState};
use text2sql_teardown::config::{QueryWait, VariableStore};
use text2sql_teardown::{CloudServices, Config};

pub const AGENT_NAME: &str = "text2sql-agent";
pub const AGENT_ID: &str = "AGENT12345";
pub const AGENT_ROLE: &str = "AmazonBedrockExecutionRoleForAgents_text2sql";
pub const DATABASE: &str = "text2sql_db";
pub const BASE_BUCKET: &str = "demo-base-123";
pub const RESULTS_BUCKET: &str = "demo-athena-results-123";
pub const FUNCTION: &str = "fn-demo";

/// Config matching the demo environment, polling without delay
pub fn demo_config() -> Config {
    let store = VariableStore {
        import_path: Some("/home/sagemaker-user/text2sql".to_string()),
        region: Some("us-east-1".to_string()),
        base_bucket_name: Some(BASE_BUCKET.to_string()),
        athena_results_bucket_name: Some(RESULTS_BUCKET.to_string()),
        athena_database_name: Some(DATABASE.to_string()),
        text2sql_lambda_function_name: Some(FUNCTION.to_string()),
        agent_name: Some(AGENT_NAME.to_string()),
        ..Default::default()
    };
    let mut config = Config::from_store(store).unwrap();
    config.query_wait = fast_wait();
    config
}

pub fn fast_wait() -> QueryWait {
    QueryWait {
        timeout: Duration::from_millis(50),
        poll_interval: Duration::ZERO,
    }
}

#[derive(Debug, Clone)]
struct FakeAgent {
    id: String,
    role_arn: Option<String>,
    aliases: usize,
}

/// Versioned bucket: deleting a current object leaves a noncurrent version
/// and a delete marker behind.
#[derive(Debug, Clone, Default)]
struct FakeBucket {
    current: Vec<String>,
    noncurrent: usize,
    delete_markers: usize,
}

impl FakeBucket {
    fn is_empty(&self) -> bool {
        self.current.is_empty() && self.noncurrent == 0 && self.delete_markers == 0
    }
}

#[derive(Debug, Clone)]
struct FakeQuery {
    polls_left: usize,
    outcome: QueryState,
}

#[derive(Debug, Default)]
struct State {
    agents: HashMap<String, FakeAgent>,
    roles: HashSet<String>,
    databases: HashMap<String, Vec<String>>,
    buckets: HashMap<String, FakeBucket>,
    functions: HashSet<String>,
    queries: HashMap<String, FakeQuery>,
    next_query: usize,
    /// Polls a query reports QUEUED/RUNNING before its final state
    polls_before_done: usize,
    /// Queries never leave RUNNING
    stuck_queries: bool,
    /// SQL substring -> failure reason
    failing_sql: Option<(String, String)>,
    calls: Vec<String>,
}

/// In-memory stand-in for the remote services. Enforces the same
/// dependency rules the real services do.
#[derive(Default)]
pub struct FakeCloud {
    state: Mutex<State>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// The environment left behind by the setup step
    pub fn demo() -> Self {
        let cloud = Self::new();
        cloud.add_agent(AGENT_NAME, AGENT_ID, Some(AGENT_ROLE));
        cloud.add_database(DATABASE, &["orders", "customers"]);
        cloud.add_bucket(BASE_BUCKET, &["data/orders.csv", "data/customers.csv"], 2);
        cloud.add_bucket(RESULTS_BUCKET, &["results/abc.csv"], 0);
        cloud.add_function(FUNCTION);
        cloud
    }

    pub fn add_agent(&self, name: &str, id: &str, role: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        let role_arn = role.map(|r| format!("arn:aws:iam::123456789012:role/{}", r));
        if let Some(r) = role {
            state.roles.insert(r.to_string());
        }
        state.agents.insert(
            name.to_string(),
            FakeAgent {
                id: id.to_string(),
                role_arn,
                aliases: 0,
            },
        );
    }

    pub fn add_agent_alias(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(agent) = state.agents.get_mut(name) {
            agent.aliases += 1;
        }
    }

    pub fn add_database(&self, name: &str, tables: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.databases.insert(
            name.to_string(),
            tables.iter().map(|t| t.to_string()).collect(),
        );
    }

    /// Bucket with current objects and `old_versions` noncurrent versions
    pub fn add_bucket(&self, name: &str, objects: &[&str], old_versions: usize) {
        let mut state = self.state.lock().unwrap();
        state.buckets.insert(
            name.to_string(),
            FakeBucket {
                current: objects.iter().map(|o| o.to_string()).collect(),
                noncurrent: old_versions,
                delete_markers: 0,
            },
        );
    }

    pub fn add_function(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .functions
            .insert(name.to_string());
    }

    pub fn remove_function(&self, name: &str) {
        self.state.lock().unwrap().functions.remove(name);
    }

    pub fn set_polls_before_done(&self, polls: usize) {
        self.state.lock().unwrap().polls_before_done = polls;
    }

    pub fn set_stuck_queries(&self) {
        self.state.lock().unwrap().stuck_queries = true;
    }

    pub fn fail_queries_containing(&self, sql: &str, reason: &str) {
        self.state.lock().unwrap().failing_sql = Some((sql.to_string(), reason.to_string()));
    }

    pub fn has_agent(&self, name: &str) -> bool {
        self.state.lock().unwrap().agents.contains_key(name)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.state.lock().unwrap().roles.contains(name)
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.state.lock().unwrap().databases.contains_key(name)
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        self.state.lock().unwrap().buckets.contains_key(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.state.lock().unwrap().functions.contains(name)
    }

    /// Every call made so far, as "operation argument"
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// SQL text of every submitted query, in order
    pub fn submitted_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("start_query ").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn identifier(sql: &str) -> String {
    sql.rsplit(' ').next().unwrap_or("").trim_matches('`').to_string()
}

impl CloudServices for FakeCloud {
    fn find_agent_id(&self, name: &str) -> Result<Option<String>> {
        self.record(format!("find_agent_id {}", name));
        let state = self.state.lock().unwrap();
        Ok(state.agents.get(name).map(|a| a.id.clone()))
    }

    fn agent_role_arn(&self, agent_id: &str) -> Result<Option<String>> {
        self.record(format!("agent_role_arn {}", agent_id));
        let state = self.state.lock().unwrap();
        match state.agents.values().find(|a| a.id == agent_id) {
            Some(agent) => Ok(agent.role_arn.clone()),
            None => Err(AwsError::not_found("bedrock-agent get-agent", agent_id).into()),
        }
    }

    fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.record(format!("delete_agent {}", agent_id));
        let mut state = self.state.lock().unwrap();
        let Some(name) = state
            .agents
            .iter()
            .find(|(_, a)| a.id == agent_id)
            .map(|(n, _)| n.clone())
        else {
            return Err(AwsError::not_found("bedrock-agent delete-agent", agent_id)
                .with_code("ResourceNotFoundException")
                .into());
        };
        if state.agents[&name].aliases > 0 {
            return Err(
                AwsError::dependency_exists("bedrock-agent delete-agent", "agent has aliases")
                    .with_code("ConflictException")
                    .into(),
            );
        }
        state.agents.remove(&name);
        Ok(())
    }

    fn delete_role(&self, role_name: &str) -> Result<bool> {
        self.record(format!("delete_role {}", role_name));
        Ok(self.state.lock().unwrap().roles.remove(role_name))
    }

    fn database_exists(&self, database: &str) -> Result<bool> {
        Ok(self.has_database(database))
    }

    fn list_table_names(&self, _catalog: &str, database: &str) -> Result<Vec<String>> {
        self.record(format!("list_table_names {}", database));
        let state = self.state.lock().unwrap();
        match state.databases.get(database) {
            Some(tables) => Ok(tables.clone()),
            None => Err(AwsError::from_stderr(
                "athena list-table-metadata",
                &format!(
                    "An error occurred (MetadataException) when calling the ListTableMetadata \
                     operation: Database {} not found",
                    database
                ),
            )
            .into()),
        }
    }

    fn start_query(
        &self,
        query: &str,
        context: &QueryContext,
        output_location: &str,
    ) -> Result<String> {
        self.record(format!("start_query {}", query));
        let mut state = self.state.lock().unwrap();
        state.next_query += 1;
        let id = format!("q-{}", state.next_query);

        let output_bucket = output_location
            .trim_start_matches("s3://")
            .trim_end_matches('/')
            .to_string();
        let target = identifier(query);

        let outcome = if let Some((_, reason)) = state
            .failing_sql
            .clone()
            .filter(|(needle, _)| query.contains(needle.as_str()))
        {
            QueryState::Failed(reason)
        } else if !state.buckets.contains_key(&output_bucket) {
            QueryState::Failed(format!(
                "Unable to verify/create output bucket {}",
                output_bucket
            ))
        } else if query.starts_with("DROP TABLE IF EXISTS") {
            let database = context.database.clone().unwrap_or_default();
            if let Some(tables) = state.databases.get_mut(&database) {
                tables.retain(|t| *t != target);
            }
            QueryState::Succeeded
        } else if query.starts_with("DROP DATABASE IF EXISTS") {
            match state.databases.get(&target) {
                Some(tables) if !tables.is_empty() => QueryState::Failed(format!(
                    "FAILED: InvalidOperationException(message:Database {} is not empty. \
                     One or more tables exist.)",
                    target
                )),
                _ => {
                    state.databases.remove(&target);
                    QueryState::Succeeded
                }
            }
        } else {
            QueryState::Failed(format!("unsupported statement: {}", query))
        };

        let polls_left = state.polls_before_done;
        state.queries.insert(
            id.clone(),
            FakeQuery {
                polls_left,
                outcome,
            },
        );
        Ok(id)
    }

    fn query_state(&self, query_id: &str) -> Result<QueryState> {
        let mut state = self.state.lock().unwrap();
        let stuck = state.stuck_queries;
        let Some(query) = state.queries.get_mut(query_id) else {
            return Err(AwsError::new(
                ErrorKind::Other,
                "athena get-query-execution",
                format!("unknown query {}", query_id),
            )
            .into());
        };
        if stuck {
            return Ok(QueryState::Running);
        }
        if query.polls_left > 0 {
            query.polls_left -= 1;
            return Ok(if query.polls_left % 2 == 0 {
                QueryState::Running
            } else {
                QueryState::Queued
            });
        }
        Ok(query.outcome.clone())
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.has_bucket(bucket))
    }

    fn delete_objects(&self, bucket: &str) -> Result<()> {
        self.record(format!("delete_objects {}", bucket));
        let mut state = self.state.lock().unwrap();
        let Some(b) = state.buckets.get_mut(bucket) else {
            return Err(AwsError::not_found("s3 rm", "NoSuchBucket")
                .with_code("NoSuchBucket")
                .into());
        };
        let removed = b.current.len();
        b.current.clear();
        b.noncurrent += removed;
        b.delete_markers += removed;
        Ok(())
    }

    fn delete_object_versions(&self, bucket: &str) -> Result<usize> {
        self.record(format!("delete_object_versions {}", bucket));
        let mut state = self.state.lock().unwrap();
        let Some(b) = state.buckets.get_mut(bucket) else {
            return Err(AwsError::not_found("s3api list-object-versions", "NoSuchBucket")
                .with_code("NoSuchBucket")
                .into());
        };
        let purged = b.current.len() + b.noncurrent + b.delete_markers;
        *b = FakeBucket::default();
        Ok(purged)
    }

    fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.record(format!("delete_bucket {}", bucket));
        let mut state = self.state.lock().unwrap();
        match state.buckets.get(bucket) {
            None => Err(AwsError::not_found("s3api delete-bucket", "NoSuchBucket")
                .with_code("NoSuchBucket")
                .into()),
            Some(b) if !b.is_empty() => Err(AwsError::dependency_exists(
                "s3api delete-bucket",
                "The bucket you tried to delete is not empty",
            )
            .with_code("BucketNotEmpty")
            .into()),
            Some(_) => {
                state.buckets.remove(bucket);
                Ok(())
            }
        }
    }

    fn function_exists(&self, name: &str) -> Result<bool> {
        Ok(self.has_function(name))
    }

    fn delete_function(&self, name: &str) -> Result<()> {
        self.record(format!("delete_function {}", name));
        if self.state.lock().unwrap().functions.remove(name) {
            Ok(())
        } else {
            Err(AwsError::not_found(
                "lambda delete-function",
                format!("Function not found: {}", name),
            )
            .with_code("ResourceNotFoundException")
            .into())
        }
    }
}
