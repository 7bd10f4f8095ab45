use anyhow::Result;

use crate::aws::{AwsCli, QueryContext, QueryState};

/// Remote operations the teardown needs (abstracts the aws CLI)
pub trait CloudServices {
    /// Agent id for a display name, `None` when no such agent exists
    fn find_agent_id(&self, name: &str) -> Result<Option<String>>;
    fn agent_role_arn(&self, agent_id: &str) -> Result<Option<String>>;
    fn delete_agent(&self, agent_id: &str) -> Result<()>;
    /// Delete an IAM role and its policies. Returns false if it was already gone.
    fn delete_role(&self, role_name: &str) -> Result<bool>;

    fn database_exists(&self, database: &str) -> Result<bool>;
    fn list_table_names(&self, catalog: &str, database: &str) -> Result<Vec<String>>;
    fn start_query(&self, query: &str, context: &QueryContext, output_location: &str)
        -> Result<String>;
    fn query_state(&self, query_id: &str) -> Result<QueryState>;

    fn bucket_exists(&self, bucket: &str) -> Result<bool>;
    /// Delete current objects
    fn delete_objects(&self, bucket: &str) -> Result<()>;
    /// Delete non-current versions and delete markers, returning how many
    fn delete_object_versions(&self, bucket: &str) -> Result<usize>;
    fn delete_bucket(&self, bucket: &str) -> Result<()>;

    fn function_exists(&self, name: &str) -> Result<bool>;
    fn delete_function(&self, name: &str) -> Result<()>;
}

impl CloudServices for AwsCli {
    fn find_agent_id(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .bedrock_agent()
            .find_agent_by_name(name)?
            .map(|a| a.agent_id))
    }

    fn agent_role_arn(&self, agent_id: &str) -> Result<Option<String>> {
        self.bedrock_agent().get_agent_role_arn(agent_id)
    }

    fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.bedrock_agent().delete_agent(agent_id)?;
        Ok(())
    }

    fn delete_role(&self, role_name: &str) -> Result<bool> {
        self.iam().delete_role_with_policies(role_name)
    }

    fn database_exists(&self, database: &str) -> Result<bool> {
        self.glue().database_exists(database)
    }

    fn list_table_names(&self, catalog: &str, database: &str) -> Result<Vec<String>> {
        self.athena().list_table_names(catalog, database)
    }

    fn start_query(
        &self,
        query: &str,
        context: &QueryContext,
        output_location: &str,
    ) -> Result<String> {
        self.athena()
            .start_query_execution(query, context, output_location)
    }

    fn query_state(&self, query_id: &str) -> Result<QueryState> {
        self.athena().get_query_state(query_id)
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.s3().bucket_exists(bucket)
    }

    fn delete_objects(&self, bucket: &str) -> Result<()> {
        self.s3().rm_recursive(bucket)
    }

    fn delete_object_versions(&self, bucket: &str) -> Result<usize> {
        self.s3().delete_all_versions(bucket)
    }

    fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.s3().delete_bucket(bucket)
    }

    fn function_exists(&self, name: &str) -> Result<bool> {
        self.lambda().function_exists(name)
    }

    fn delete_function(&self, name: &str) -> Result<()> {
        self.lambda().delete_function(name)
    }
}
