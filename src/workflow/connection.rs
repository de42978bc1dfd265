use crate::context::AppContext;
use crate::domain::ticket::ProjectSummary;
use crate::error::{AppError, AppResult};

/// Read-only check that the token can see the default project.
pub async fn test_connection(ctx: &AppContext) -> AppResult<ProjectSummary> {
    if ctx.settings.token().is_none() {
        return Err(AppError::Configuration(
            "enter a GitLab token first".to_string(),
        ));
    }
    let project_id = ctx.settings.project_id().ok_or_else(|| {
        AppError::Configuration("enter a default project id first".to_string())
    })?;

    ctx.issue_tracker.fetch_project(project_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::workflow::fakes::{Call, FakeTracker, configured_settings, context};

    #[tokio::test]
    async fn fetches_default_project() {
        let (ctx, tracker, _browser) = context(configured_settings(), FakeTracker::new());

        let project = test_connection(&ctx).await.expect("project");

        assert_eq!(project.name, "Design / App");
        assert_eq!(tracker.calls(), vec![Call::FetchProject("99".to_string())]);
    }

    #[tokio::test]
    async fn requires_token_and_project() {
        for settings in [
            Settings {
                gitlab_token: " ".to_string(),
                ..configured_settings()
            },
            Settings {
                default_project_id: String::new(),
                ..configured_settings()
            },
        ] {
            let (ctx, tracker, _browser) = context(settings, FakeTracker::new());
            let err = test_connection(&ctx).await.unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
            assert!(tracker.calls().is_empty());
        }
    }
}
