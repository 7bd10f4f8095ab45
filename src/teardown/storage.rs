use anyhow::Result;
use tracing::{debug, info};

use super::report::Deleted;
use super::services::CloudServices;

/// Empty a versioned bucket and delete it.
///
/// Current objects go first, then every remaining version and delete
/// marker; the bucket delete is only accepted once nothing is left. There is
/// no emptiness check before the final delete: a leftover version surfaces
/// as a `BucketNotEmpty` error from the service.
pub fn empty_and_delete_bucket(
    services: &dyn CloudServices,
    bucket: &str,
    deleted: &mut Vec<Deleted>,
) -> Result<()> {
    services.delete_objects(bucket)?;
    debug!(bucket, "current objects deleted");

    let versions = services.delete_object_versions(bucket)?;
    debug!(bucket, versions, "object versions deleted");

    services.delete_bucket(bucket)?;
    info!(bucket, versions, "bucket deleted");
    deleted.push(Deleted::Bucket {
        name: bucket.to_string(),
        versions,
    });
    Ok(())
}
