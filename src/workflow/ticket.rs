use crate::context::AppContext;
use crate::domain::description::issue_description;
use crate::domain::labels::compose_labels;
use crate::domain::note::parse_ticket;
use crate::domain::ticket::{CreatedIssue, NewIssue, TicketMetadata};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct TicketWorkflowOutcome {
    pub issue: CreatedIssue,
    pub metadata: TicketMetadata,
    pub labels: Vec<String>,
    pub assigned: bool,
    pub browser_opened: bool,
}

/// Parses `note` and creates one issue from it. Nothing is sent when the
/// token, title, summary or project id is missing.
pub async fn create_ticket_from_note(
    ctx: &AppContext,
    note: &str,
    open_browser: bool,
) -> AppResult<TicketWorkflowOutcome> {
    if ctx.settings.token().is_none() {
        return Err(AppError::Configuration(
            "GitLab token not configured; run `dticket config set gitlab-token <TOKEN>`"
                .to_string(),
        ));
    }

    let metadata = parse_ticket(note, &ctx.settings)?;

    let assignee_id = match metadata.assignee.as_deref() {
        Some(username) => resolve_assignee(ctx, username).await,
        None => None,
    };

    let labels = compose_labels(
        &metadata.labels,
        &ctx.settings.default_label_list(),
        metadata.story_points,
        &metadata.priority,
    );

    let request = NewIssue {
        title: metadata.title.clone(),
        description: issue_description(note),
        assignee_id,
        labels: labels.clone(),
        weight: (metadata.story_points > 0).then_some(metadata.story_points),
    };

    let issue = ctx
        .issue_tracker
        .create_issue(&metadata.project_id, request)
        .await?;
    tracing::info!(iid = issue.iid, project_id = issue.project_id, "issue created");

    let browser_opened = open_browser && open_issue(ctx, &issue.web_url);

    Ok(TicketWorkflowOutcome {
        issue,
        metadata,
        labels,
        assigned: assignee_id.is_some(),
        browser_opened,
    })
}

async fn resolve_assignee(ctx: &AppContext, username: &str) -> Option<u64> {
    match ctx.issue_tracker.find_user_id(username).await {
        Ok(Some(id)) => Some(id),
        Ok(None) => {
            tracing::warn!(username, "no GitLab user found; creating issue without assignee");
            None
        }
        Err(err) => {
            tracing::warn!(username, error = %err, "assignee lookup failed; creating issue without assignee");
            None
        }
    }
}

fn open_issue(ctx: &AppContext, url: &str) -> bool {
    match ctx.browser.open(url) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "could not open the created issue");
            false
        }
    }
}
