use anyhow::Result;
use tracing::{debug, info};

use super::report::Deleted;
use super::services::CloudServices;
use crate::aws::{role_name_from_arn, AwsError};

/// Delete the named agent and, when `delete_role` is set, the IAM role it
/// runs as. Exactly one delete request is issued for the agent.
pub fn delete_agent(
    services: &dyn CloudServices,
    name: &str,
    delete_role: bool,
    deleted: &mut Vec<Deleted>,
) -> Result<()> {
    let agent_id = services.find_agent_id(name)?.ok_or_else(|| {
        AwsError::not_found("bedrock-agent list-agents", format!("no agent named '{}'", name))
    })?;

    // The role ARN is only readable while the agent still exists
    let role_arn = if delete_role {
        services.agent_role_arn(&agent_id)?
    } else {
        None
    };

    services.delete_agent(&agent_id)?;
    info!(agent = name, agent_id = %agent_id, "agent deleted");
    deleted.push(Deleted::Agent {
        name: name.to_string(),
        id: agent_id,
    });

    if let Some(arn) = role_arn {
        let role = role_name_from_arn(&arn);
        if services.delete_role(role)? {
            info!(role, "agent role deleted");
            deleted.push(Deleted::Role(role.to_string()));
        } else {
            debug!(role, "agent role already absent");
        }
    }

    Ok(())
}
