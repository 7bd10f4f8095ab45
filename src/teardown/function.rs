use anyhow::Result;
use tracing::info;

use super::report::Deleted;
use super::services::CloudServices;

/// Delete the serverless function. Deleting an already-deleted function
/// surfaces the service's NotFound error.
pub fn delete_function(
    services: &dyn CloudServices,
    name: &str,
    deleted: &mut Vec<Deleted>,
) -> Result<()> {
    services.delete_function(name)?;
    info!(function = name, "function deleted");
    deleted.push(Deleted::Function(name.to_string()));
    Ok(())
}
