use super::{run_json, AwsCli};
use anyhow::Result;
use serde::Deserialize;

pub struct BedrockAgentCli<'a> {
    pub(super) aws: &'a AwsCli,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAgentsResponse {
    #[serde(default)]
    agent_summaries: Vec<AgentSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default)]
    pub agent_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAgentResponse {
    agent: AgentDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentDetail {
    #[serde(default)]
    agent_resource_role_arn: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAgentResponse {
    agent_status: String,
}

impl BedrockAgentCli<'_> {
    /// Look up an agent by its display name. The CLI pages through
    /// `list-agents` on its own.
    pub fn find_agent_by_name(&self, name: &str) -> Result<Option<AgentSummary>> {
        let mut cmd = self.aws.command("bedrock-agent", "list-agents");
        cmd.args(["--output", "json"]);
        let response: ListAgentsResponse = run_json(&mut cmd)?;
        Ok(response
            .agent_summaries
            .into_iter()
            .find(|a| a.agent_name == name))
    }

    pub fn get_agent_role_arn(&self, agent_id: &str) -> Result<Option<String>> {
        let mut cmd = self.aws.command("bedrock-agent", "get-agent");
        cmd.args(["--agent-id", agent_id, "--output", "json"]);
        let response: GetAgentResponse = run_json(&mut cmd)?;
        Ok(response.agent.agent_resource_role_arn)
    }

    /// Issue the delete request. The in-use check is left on, so an agent
    /// with live aliases fails with a ConflictException.
    pub fn delete_agent(&self, agent_id: &str) -> Result<String> {
        let mut cmd = self.aws.command("bedrock-agent", "delete-agent");
        cmd.args(["--agent-id", agent_id, "--output", "json"]);
        let response: DeleteAgentResponse = run_json(&mut cmd)?;
        Ok(response.agent_status)
    }
}
