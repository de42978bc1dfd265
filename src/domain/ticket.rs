use crate::config::Settings;
use crate::domain::note::ParsedNote;
use crate::error::{AppError, AppResult};

/// Validated ticket fields extracted from one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketMetadata {
    pub title: String,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub story_points: u32,
    pub priority: String,
    pub project_id: String,
    pub summary: String,
    pub requirements: Vec<String>,
    pub acceptance_criteria: Vec<String>,
}

impl TicketMetadata {
    /// Applies defaults from `settings` and rejects notes that cannot become a ticket.
    pub fn from_note(note: ParsedNote, settings: &Settings) -> AppResult<Self> {
        let title = note
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation(
                    "note has no title; add a '# ' heading or a 'title:' front-matter field"
                        .to_string(),
                )
            })?;

        if note.summary.trim().is_empty() {
            return Err(AppError::Validation(
                "note has no summary; add text under a '## Summary' heading".to_string(),
            ));
        }

        let project_id = note
            .project_id
            .or_else(|| settings.project_id().map(str::to_string))
            .ok_or_else(|| {
                AppError::Configuration(
                    "no project id; set gitlab-project-id in the note front-matter or default-project-id in settings"
                        .to_string(),
                )
            })?;

        Ok(Self {
            title: title.trim().to_string(),
            assignee: note.assignee,
            labels: note.labels,
            story_points: note.story_points.unwrap_or(0),
            priority: note
                .priority
                .unwrap_or_else(|| settings.priority().to_string()),
            project_id,
            summary: note.summary,
            requirements: note.requirements,
            acceptance_criteria: note.acceptance_criteria,
        })
    }
}

/// Payload for one issue creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub assignee_id: Option<u64>,
    pub labels: Vec<String>,
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub iid: u64,
    pub project_id: u64,
    pub web_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub web_url: Option<String>,
}
