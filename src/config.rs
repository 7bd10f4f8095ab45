use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = ".text2sql.toml";

pub const DEFAULT_AGENT_NAME: &str = "text2sql-agent";
pub const DEFAULT_CATALOG: &str = "AwsDataCatalog";
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 120;
const DEFAULT_QUERY_POLL_INTERVAL_SECS: u64 = 2;

/// Variables as persisted by the setup step. Every field is optional here so
/// that a missing key can be reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athena_results_bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athena_database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text2sql_lambda_function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_poll_interval_secs: Option<u64>,
}

/// How long to wait on a submitted Athena query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for QueryWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(DEFAULT_QUERY_POLL_INTERVAL_SECS),
        }
    }
}

/// Validated teardown configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub import_path: String,
    pub region: String,
    pub base_bucket_name: String,
    pub athena_results_bucket_name: String,
    pub athena_database_name: String,
    pub text2sql_lambda_function_name: String,
    pub agent_name: String,
    pub catalog: String,
    pub query_wait: QueryWait,
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => bail!("Stored variable '{}' is empty", key),
        None => bail!(
            "Stored variable '{}' is missing. Run the setup step (or `text2sql-teardown init`) first.",
            key
        ),
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let store = load_store_from_path(path)?;
        Self::from_store(store)
    }

    pub fn from_store(store: VariableStore) -> Result<Self> {
        let defaults = QueryWait::default();
        Ok(Self {
            import_path: required(store.import_path, "import_path")?,
            region: required(store.region, "region")?,
            base_bucket_name: required(store.base_bucket_name, "base_bucket_name")?,
            athena_results_bucket_name: required(
                store.athena_results_bucket_name,
                "athena_results_bucket_name",
            )?,
            athena_database_name: required(store.athena_database_name, "athena_database_name")?,
            text2sql_lambda_function_name: required(
                store.text2sql_lambda_function_name,
                "text2sql_lambda_function_name",
            )?,
            agent_name: store
                .agent_name
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
            catalog: store.catalog.unwrap_or_else(|| DEFAULT_CATALOG.to_string()),
            query_wait: QueryWait {
                timeout: store
                    .query_timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                poll_interval: store
                    .query_poll_interval_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.poll_interval),
            },
        })
    }

    /// Override the stored region (command-line `--region`)
    pub fn with_region(mut self, region: Option<String>) -> Self {
        if let Some(region) = region {
            self.region = region;
        }
        self
    }

    /// S3 location Athena writes DDL results to
    pub fn athena_output_location(&self) -> String {
        format!("s3://{}/", self.athena_results_bucket_name)
    }

    pub fn to_store(&self) -> VariableStore {
        VariableStore {
            import_path: Some(self.import_path.clone()),
            region: Some(self.region.clone()),
            base_bucket_name: Some(self.base_bucket_name.clone()),
            athena_results_bucket_name: Some(self.athena_results_bucket_name.clone()),
            athena_database_name: Some(self.athena_database_name.clone()),
            text2sql_lambda_function_name: Some(self.text2sql_lambda_function_name.clone()),
            agent_name: Some(self.agent_name.clone()),
            catalog: Some(self.catalog.clone()),
            query_timeout_secs: Some(self.query_wait.timeout.as_secs()),
            query_poll_interval_secs: Some(self.query_wait.poll_interval.as_secs()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(&self.to_store())?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}

pub fn load_store_from_path(path: impl AsRef<Path>) -> Result<VariableStore> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let store: VariableStore = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(store)
}
