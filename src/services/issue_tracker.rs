use async_trait::async_trait;

use crate::domain::ticket::{CreatedIssue, NewIssue, ProjectSummary};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Numeric id of the first user matching `username`, if any.
    async fn find_user_id(&self, username: &str) -> AppResult<Option<u64>>;
    async fn create_issue(&self, project_id: &str, issue: NewIssue) -> AppResult<CreatedIssue>;
    async fn fetch_project(&self, project_id: &str) -> AppResult<ProjectSummary>;
}
