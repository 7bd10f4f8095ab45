use super::{run_checked, run_optional, AwsCli};
use anyhow::Result;

pub struct LambdaCli<'a> {
    pub(super) aws: &'a AwsCli,
}

impl LambdaCli<'_> {
    pub fn function_exists(&self, name: &str) -> Result<bool> {
        let mut cmd = self.aws.command("lambda", "get-function");
        cmd.args(["--function-name", name]);
        let result = run_optional(&mut cmd, &["ResourceNotFoundException"])?;
        Ok(result.is_some())
    }

    /// Delete a function. A missing function is reported as a NotFound error,
    /// not treated as success.
    pub fn delete_function(&self, name: &str) -> Result<()> {
        let mut cmd = self.aws.command("lambda", "delete-function");
        cmd.args(["--function-name", name]);
        run_checked(&mut cmd)?;
        Ok(())
    }
}
