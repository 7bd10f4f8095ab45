use super::{run_idempotent, run_optional, AwsCli};
use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

pub struct IamCli<'a> {
    pub(super) aws: &'a AwsCli,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListRolePoliciesResponse {
    #[serde(default)]
    policy_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListAttachedRolePoliciesResponse {
    #[serde(default)]
    attached_policies: Vec<AttachedPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttachedPolicy {
    policy_arn: String,
}

/// Role name from an IAM role ARN (`arn:aws:iam::123:role/path/name` -> `name`)
pub fn role_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

impl IamCli<'_> {
    /// Remove inline and managed policies, then the role itself.
    /// Returns false when the role was already gone.
    pub fn delete_role_with_policies(&self, name: &str) -> Result<bool> {
        let mut cmd = self.aws.command("iam", "list-role-policies");
        cmd.args(["--role-name", name, "--output", "json"]);
        let Some(json) = run_optional(&mut cmd, &["NoSuchEntity"])? else {
            return Ok(false);
        };
        let inline: ListRolePoliciesResponse = serde_json::from_str(&json)?;
        for policy in &inline.policy_names {
            debug!(role = name, policy = %policy, "deleting inline policy");
            let mut cmd = self.aws.command("iam", "delete-role-policy");
            cmd.args(["--role-name", name, "--policy-name", policy]);
            run_idempotent(&mut cmd, &["NoSuchEntity"])?;
        }

        let mut cmd = self.aws.command("iam", "list-attached-role-policies");
        cmd.args(["--role-name", name, "--output", "json"]);
        if let Some(json) = run_optional(&mut cmd, &["NoSuchEntity"])? {
            let attached: ListAttachedRolePoliciesResponse = serde_json::from_str(&json)?;
            for policy in &attached.attached_policies {
                debug!(role = name, policy = %policy.policy_arn, "detaching managed policy");
                let mut cmd = self.aws.command("iam", "detach-role-policy");
                cmd.args(["--role-name", name, "--policy-arn", &policy.policy_arn]);
                run_idempotent(&mut cmd, &["NoSuchEntity"])?;
            }
        }

        let mut cmd = self.aws.command("iam", "delete-role");
        cmd.args(["--role-name", name]);
        let already_gone = run_idempotent(&mut cmd, &["NoSuchEntity"])?;
        Ok(!already_gone)
    }
}
