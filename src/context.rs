use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::infra::browser::SystemBrowser;
use crate::infra::gitlab::GitLabClient;
use crate::services::{BrowserService, IssueTrackerService};

#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub browser: Arc<dyn BrowserService>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        issue_tracker: Arc<dyn IssueTrackerService>,
        browser: Arc<dyn BrowserService>,
    ) -> Self {
        Self {
            settings,
            issue_tracker,
            browser,
        }
    }

    /// Wires the GitLab client and system browser for `settings`.
    pub fn from_settings(settings: Settings) -> AppResult<Self> {
        let issue_tracker = Arc::new(GitLabClient::new(
            settings.base_url(),
            settings.token().map(str::to_string),
        )?);
        Ok(Self::new(settings, issue_tracker, Arc::new(SystemBrowser)))
    }
}
