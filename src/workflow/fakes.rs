use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Settings;
use crate::context::AppContext;
use crate::domain::ticket::{CreatedIssue, NewIssue, ProjectSummary};
use crate::error::{AppError, AppResult};
use crate::services::{BrowserService, IssueTrackerService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindUser(String),
    CreateIssue(String, NewIssue),
    FetchProject(String),
}

pub enum UserLookup {
    Found(u64),
    Missing,
    Fails,
}

pub struct FakeTracker {
    pub calls: Mutex<Vec<Call>>,
    pub user: UserLookup,
    pub create_error: Option<String>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            user: UserLookup::Found(7),
            create_error: None,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn find_user_id(&self, username: &str) -> AppResult<Option<u64>> {
        self.record(Call::FindUser(username.to_string()));
        match self.user {
            UserLookup::Found(id) => Ok(Some(id)),
            UserLookup::Missing => Ok(None),
            UserLookup::Fails => Err(AppError::Transport("connection reset".to_string())),
        }
    }

    async fn create_issue(&self, project_id: &str, issue: NewIssue) -> AppResult<CreatedIssue> {
        self.record(Call::CreateIssue(project_id.to_string(), issue));
        if let Some(message) = &self.create_error {
            return Err(AppError::IssueTracker(message.clone()));
        }
        Ok(CreatedIssue {
            iid: 12,
            project_id: 42,
            web_url: "https://gitlab.example.com/design/app/-/issues/12".to_string(),
        })
    }

    async fn fetch_project(&self, project_id: &str) -> AppResult<ProjectSummary> {
        self.record(Call::FetchProject(project_id.to_string()));
        Ok(ProjectSummary {
            name: "Design / App".to_string(),
            web_url: Some("https://gitlab.example.com/design/app".to_string()),
        })
    }
}

#[derive(Default)]
pub struct FakeBrowser {
    pub opened: Mutex<Vec<String>>,
}

impl FakeBrowser {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("opened lock").clone()
    }
}

impl BrowserService for FakeBrowser {
    fn open(&self, url: &str) -> AppResult<()> {
        self.opened.lock().expect("opened lock").push(url.to_string());
        Ok(())
    }
}

pub fn context(
    settings: Settings,
    tracker: FakeTracker,
) -> (AppContext, Arc<FakeTracker>, Arc<FakeBrowser>) {
    let tracker = Arc::new(tracker);
    let browser = Arc::new(FakeBrowser::default());
    let ctx = AppContext::new(settings, tracker.clone(), browser.clone());
    (ctx, tracker, browser)
}

pub fn configured_settings() -> Settings {
    Settings {
        gitlab_url: "https://gitlab.example.com".to_string(),
        gitlab_token: "glpat-test".to_string(),
        default_project_id: "99".to_string(),
        default_labels: "design".to_string(),
        ..Settings::default()
    }
}
