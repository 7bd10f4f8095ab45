use super::{run_checked, run_optional, AwsCli, AwsError, ErrorKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct S3Cli<'a> {
    pub(super) aws: &'a AwsCli,
}

/// S3 accepts at most 1000 keys per DeleteObjects request
pub const DELETE_BATCH_SIZE: usize = 1000;

/// Upper bound on one `--delete` payload. Linux caps a single exec argument
/// at 128 KiB.
pub const MAX_PAYLOAD_BYTES: usize = 100 * 1024;

const PAYLOAD_OVERHEAD: usize = r#"{"Objects":[],"Quiet":true}"#.len();

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjectVersionsResponse {
    #[serde(default)]
    versions: Vec<VersionEntry>,
    #[serde(default)]
    delete_markers: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VersionEntry {
    key: String,
    version_id: Option<String>,
}

/// One entry of a DeleteObjects request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectIdentifier {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteObjectsResponse {
    #[serde(default)]
    errors: Vec<DeleteObjectError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteObjectError {
    key: String,
    code: Option<String>,
    message: Option<String>,
}

/// Split identifiers into DeleteObjects payloads of at most
/// `DELETE_BATCH_SIZE` keys and `MAX_PAYLOAD_BYTES` bytes
pub fn delete_payloads(objects: &[ObjectIdentifier]) -> Result<Vec<String>> {
    let mut payloads = Vec::new();
    let mut batch: Vec<String> = Vec::new();
    let mut batch_bytes = PAYLOAD_OVERHEAD;
    for object in objects {
        let entry = serde_json::to_string(object)?;
        let full = batch.len() == DELETE_BATCH_SIZE
            || batch_bytes + entry.len() + 1 > MAX_PAYLOAD_BYTES;
        if !batch.is_empty() && full {
            payloads.push(payload(&batch));
            batch.clear();
            batch_bytes = PAYLOAD_OVERHEAD;
        }
        // Separator comma
        if !batch.is_empty() {
            batch_bytes += 1;
        }
        batch_bytes += entry.len();
        batch.push(entry);
    }
    if !batch.is_empty() {
        payloads.push(payload(&batch));
    }
    Ok(payloads)
}

fn payload(entries: &[String]) -> String {
    format!(r#"{{"Objects":[{}],"Quiet":true}}"#, entries.join(","))
}

impl S3Cli<'_> {
    pub fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let mut cmd = self.aws.command("s3api", "head-bucket");
        cmd.args(["--bucket", bucket]);
        let result = run_optional(&mut cmd, &["(404)", "Not Found", "NoSuchBucket"])?;
        Ok(result.is_some())
    }

    /// Delete every current object in the bucket
    pub fn rm_recursive(&self, bucket: &str) -> Result<()> {
        let mut cmd = self.aws.command("s3", "rm");
        let uri = format!("s3://{}", bucket);
        cmd.args([uri.as_str(), "--recursive"]);
        run_checked(&mut cmd)?;
        Ok(())
    }

    /// Every object version and delete marker still in the bucket
    pub fn list_all_versions(&self, bucket: &str) -> Result<Vec<ObjectIdentifier>> {
        let mut cmd = self.aws.command("s3api", "list-object-versions");
        cmd.args(["--bucket", bucket, "--output", "json"]);
        let stdout = run_checked(&mut cmd)?;
        // CLI v1 prints nothing when the bucket holds no versions
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        let response: ListObjectVersionsResponse = serde_json::from_str(&stdout)?;
        Ok(response
            .versions
            .into_iter()
            .chain(response.delete_markers)
            .map(|v| ObjectIdentifier {
                key: v.key,
                version_id: v.version_id,
            })
            .collect())
    }

    /// Purge all versions and delete markers. Returns how many were removed.
    pub fn delete_all_versions(&self, bucket: &str) -> Result<usize> {
        let objects = self.list_all_versions(bucket)?;
        for payload in delete_payloads(&objects)? {
            let mut cmd = self.aws.command("s3api", "delete-objects");
            cmd.args(["--bucket", bucket, "--delete", &payload]);
            let stdout = run_checked(&mut cmd)?;
            // Quiet mode prints nothing when every key was deleted
            if stdout.trim().is_empty() {
                continue;
            }
            let response: DeleteObjectsResponse = serde_json::from_str(&stdout)?;
            if let Some(first) = response.errors.first() {
                return Err(AwsError::new(
                    ErrorKind::Other,
                    "s3api delete-objects",
                    format!(
                        "{} key(s) not deleted, first: {} ({}: {})",
                        response.errors.len(),
                        first.key,
                        first.code.as_deref().unwrap_or("unknown"),
                        first.message.as_deref().unwrap_or("")
                    ),
                )
                .into());
            }
        }
        debug!(bucket, count = objects.len(), "purged object versions");
        Ok(objects.len())
    }

    pub fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut cmd = self.aws.command("s3api", "delete-bucket");
        cmd.args(["--bucket", bucket]);
        run_checked(&mut cmd)?;
        Ok(())
    }
}
