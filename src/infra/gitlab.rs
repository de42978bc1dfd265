use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ticket::{CreatedIssue, NewIssue, ProjectSummary};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    pub fn new(base_url: String, token: Option<String>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| AppError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GitLab token not configured".to_string()))
    }

    fn auth_header(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn users_endpoint(base_url: &str) -> String {
        format!("{base_url}/api/v4/users")
    }

    fn project_endpoint(base_url: &str, project_id: &str) -> String {
        format!(
            "{base_url}/api/v4/projects/{}",
            urlencoding::encode(project_id.trim())
        )
    }

    fn issues_endpoint(base_url: &str, project_id: &str) -> String {
        format!("{}/issues", Self::project_endpoint(base_url, project_id))
    }

    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::IssueTracker(error_message(status, &body)))
    }
}

#[async_trait]
impl IssueTrackerService for GitLabClient {
    async fn find_user_id(&self, username: &str) -> AppResult<Option<u64>> {
        let token = self.token()?;
        let endpoint = Self::users_endpoint(&self.base_url);
        tracing::debug!(%endpoint, username, "looking up GitLab user");

        let response = self
            .http
            .get(endpoint)
            .query(&[("username", username.trim())])
            .header(AUTHORIZATION, Self::auth_header(token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let users: Vec<GitLabUser> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse user list: {err}")))?;

        Ok(users.first().map(|user| user.id))
    }

    async fn create_issue(&self, project_id: &str, issue: NewIssue) -> AppResult<CreatedIssue> {
        let token = self.token()?;
        let endpoint = Self::issues_endpoint(&self.base_url, project_id);
        tracing::debug!(%endpoint, title = %issue.title, "creating GitLab issue");

        let response = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, Self::auth_header(token))
            .header(ACCEPT, "application/json")
            .json(&CreateIssueRequest::from(issue))
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let payload: CreateIssueResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse created issue: {err}")))?;

        Ok(CreatedIssue {
            iid: payload.iid,
            project_id: payload.project_id,
            web_url: payload.web_url,
        })
    }

    async fn fetch_project(&self, project_id: &str) -> AppResult<ProjectSummary> {
        let token = self.token()?;
        let endpoint = Self::project_endpoint(&self.base_url, project_id);
        tracing::debug!(%endpoint, "fetching GitLab project");

        let response = self
            .http
            .get(endpoint)
            .header(AUTHORIZATION, Self::auth_header(token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let payload: ProjectResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse project: {err}")))?;

        Ok(ProjectSummary {
            name: payload
                .name_with_namespace
                .or(payload.name)
                .unwrap_or_else(|| project_id.to_string()),
            web_url: payload.web_url,
        })
    }
}

/// Best human-readable message from a GitLab error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    };

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    ["message", "error", "error_description"]
        .iter()
        .filter_map(|field| value.get(field))
        .find_map(flatten_message)
        .unwrap_or_else(fallback)
}

fn flatten_message(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(flatten_message)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(fields) => fields
            .iter()
            .filter_map(|(field, detail)| {
                flatten_message(detail).map(|detail| format!("{field}: {detail}"))
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}

#[derive(Serialize)]
struct CreateIssueRequest {
    title: String,
    description: String,
    assignee_id: Option<u64>,
    labels: String,
    weight: Option<u32>,
}

impl From<NewIssue> for CreateIssueRequest {
    fn from(issue: NewIssue) -> Self {
        Self {
            title: issue.title,
            description: issue.description,
            assignee_id: issue.assignee_id,
            labels: issue.labels.join(","),
            weight: issue.weight,
        }
    }
}

#[derive(Deserialize)]
struct CreateIssueResponse {
    iid: u64,
    project_id: u64,
    web_url: String,
}

#[derive(Deserialize)]
struct GitLabUser {
    id: u64,
}

#[derive(Deserialize)]
struct ProjectResponse {
    name: Option<String>,
    name_with_namespace: Option<String>,
    web_url: Option<String>,
}
