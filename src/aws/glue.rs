use super::{run_optional, AwsCli};
use anyhow::Result;

pub struct GlueCli<'a> {
    pub(super) aws: &'a AwsCli,
}

impl GlueCli<'_> {
    pub fn database_exists(&self, database: &str) -> Result<bool> {
        let mut cmd = self.aws.command("glue", "get-database");
        cmd.args(["--name", database]);
        let result = run_optional(&mut cmd, &["EntityNotFoundException"])?;
        Ok(result.is_some())
    }
}
