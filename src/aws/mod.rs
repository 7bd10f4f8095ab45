mod athena;
mod bedrock_agent;
mod error;
mod glue;
mod iam;
mod lambda;
mod s3;
mod sts;

pub use athena::{AthenaCli, QueryContext, QueryState};
pub use bedrock_agent::{AgentSummary, BedrockAgentCli};
pub use error::{classify, error_kind, AwsError, ErrorKind};
pub use glue::GlueCli;
pub use iam::{role_name_from_arn, IamCli};
pub use lambda::LambdaCli;
pub use s3::{delete_payloads, ObjectIdentifier, S3Cli, DELETE_BATCH_SIZE, MAX_PAYLOAD_BYTES};
pub use sts::{AccountInfo, StsCli};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Core AWS CLI wrapper with region context
pub struct AwsCli {
    program: PathBuf,
    region: String,
}

impl AwsCli {
    pub fn new(region: &str) -> Self {
        Self::with_program("aws", region)
    }

    /// Use a specific `aws` executable instead of the one on PATH
    pub fn with_program(program: impl Into<PathBuf>, region: &str) -> Self {
        Self {
            program: program.into(),
            region: region.to_string(),
        }
    }

    /// Start an `aws <service> <operation>` command pinned to this region
    fn command(&self, service: &str, operation: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args([service, operation, "--region", &self.region]);
        cmd
    }

    // Service accessors
    pub fn sts(&self) -> StsCli<'_> {
        StsCli { aws: self }
    }
    pub fn iam(&self) -> IamCli<'_> {
        IamCli { aws: self }
    }
    pub fn bedrock_agent(&self) -> BedrockAgentCli<'_> {
        BedrockAgentCli { aws: self }
    }
    pub fn athena(&self) -> AthenaCli<'_> {
        AthenaCli { aws: self }
    }
    pub fn glue(&self) -> GlueCli<'_> {
        GlueCli { aws: self }
    }
    pub fn s3(&self) -> S3Cli<'_> {
        S3Cli { aws: self }
    }
    pub fn lambda(&self) -> LambdaCli<'_> {
        LambdaCli { aws: self }
    }
}

/// Fail early when the aws CLI is not installed
pub fn require_aws_cli() -> Result<()> {
    if Command::new("aws").arg("--version").output().is_err() {
        bail!(
            "AWS CLI not found. Install it from https://aws.amazon.com/cli/\n\
            and configure credentials with `aws configure`."
        );
    }
    Ok(())
}

/// "service operation" label used in logs and errors
fn operation_name(cmd: &Command) -> String {
    cmd.get_args()
        .take(2)
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run command, failing with a classified `AwsError` on non-zero exit
pub fn run_checked(cmd: &mut Command) -> Result<String> {
    let operation = operation_name(cmd);
    debug!(operation = %operation, "aws call");
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run aws {}", operation))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AwsError::from_stderr(&operation, &stderr).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run command, treating specific error patterns as "already in the desired state".
/// Returns true when one of the patterns matched.
pub fn run_idempotent(cmd: &mut Command, expected_errors: &[&str]) -> Result<bool> {
    let operation = operation_name(cmd);
    debug!(operation = %operation, "aws call");
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run aws {}", operation))?;
    if output.status.success() {
        return Ok(false);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for pattern in expected_errors {
        if stderr.contains(pattern) || stdout.contains(pattern) {
            debug!(operation = %operation, pattern, "treated as already done");
            return Ok(true);
        }
    }

    Err(AwsError::from_stderr(&operation, &stderr).into())
}

/// Run command and parse JSON output
pub fn run_json<T: DeserializeOwned>(cmd: &mut Command) -> Result<T> {
    let stdout = run_checked(cmd)?;
    let parsed: T = serde_json::from_str(&stdout)?;
    Ok(parsed)
}

/// Run command and return stdout as string, or None if command fails with expected error
pub fn run_optional(cmd: &mut Command, not_found_errors: &[&str]) -> Result<Option<String>> {
    let operation = operation_name(cmd);
    debug!(operation = %operation, "aws call");
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run aws {}", operation))?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        return Ok(Some(stdout));
    }

    for pattern in not_found_errors {
        if stderr.contains(pattern) || stdout.contains(pattern) {
            return Ok(None);
        }
    }

    Err(AwsError::from_stderr(&operation, &stderr).into())
}
