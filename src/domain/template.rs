use std::fmt::Write as _;

use chrono::{Days, NaiveDate};

use crate::config::{CustomTemplate, Settings};

const DUE_IN_DAYS: u64 = 7;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional sections of the generated note. The front-matter, title,
/// summary, requirements and acceptance criteria are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSections {
    pub quick_info: bool,
    pub problem: bool,
    pub solution: bool,
    pub technical_specs: bool,
    pub dependencies: bool,
    pub definition_of_done: bool,
    pub resources: bool,
    pub notes: bool,
}

impl TemplateSections {
    pub fn detailed() -> Self {
        Self {
            quick_info: true,
            problem: true,
            solution: true,
            technical_specs: true,
            dependencies: true,
            definition_of_done: true,
            resources: true,
            notes: true,
        }
    }

    pub fn compact() -> Self {
        Self {
            quick_info: false,
            problem: true,
            solution: true,
            technical_specs: false,
            dependencies: false,
            definition_of_done: false,
            resources: false,
            notes: false,
        }
    }
}

impl Default for TemplateSections {
    fn default() -> Self {
        Self::detailed()
    }
}

pub fn note_file_name(today: NaiveDate) -> String {
    format!("Design Ticket {}.md", today.format(DATE_FORMAT))
}

pub fn render_template(settings: &Settings, today: NaiveDate, sections: &TemplateSections) -> String {
    let today_str = today.format(DATE_FORMAT).to_string();
    let due_str = due_date(today).format(DATE_FORMAT).to_string();
    let mut out = String::new();

    let _ = write!(
        out,
        "---
gitlab-project-id: \"{project}\"
assignee: \"{assignee}\"
labels: \"{labels}\"
priority: \"{priority}\"
story-points: \"0\"
due-date: \"{due_str}\"
---

# 🎨 [Design Task Title]
",
        project = settings.default_project_id.trim(),
        assignee = settings.default_assignee.trim(),
        labels = settings.default_label_list().join(", "),
        priority = settings.priority(),
    );

    if sections.quick_info {
        let _ = write!(
            out,
            "
## 📋 Quick Info
**Timeline:** {today_str} → {due_str}
**Story point options:** {story_points}
**Category options:** {categories}
**Priority options:** {priorities}
**Figma:** [Paste Figma handoff link here]
**Status:** Draft
",
            story_points = bracketed(&settings.story_point_labels),
            categories = bracketed(&settings.category_labels),
            priorities = bracketed(&settings.priority_labels),
        );
    }

    out.push_str(
        "
## 📝 Summary
[One or two sentences describing the design task]
",
    );

    if sections.problem {
        out.push_str(
            "
## 🎯 Problem / Opportunity
[What are we solving and why does it matter?]
",
        );
    }

    if sections.solution {
        out.push_str(
            "
## 💡 Proposed Solution
[What are we building?]
",
        );
    }

    out.push_str(
        "
## 📌 Requirements
- [Requirement]
",
    );

    if sections.technical_specs {
        out.push_str(
            "
## 🔧 Technical Specifications
### Frontend Requirements
- **Components needed:** [List new/modified components]
- **Motion/Animations:** [Describe transitions, microinteractions, timing]
- **Breakpoints:** Mobile, Tablet, Desktop
- **Browser support:** [Specify if different from standard]
- **Accessibility:** [Any specific WCAG requirements]

### Design System Impact
- [ ] Uses existing components only
- [ ] Requires new components (list below)
- [ ] Updates existing patterns
- [ ] Creates new patterns
",
        );
    }

    if sections.dependencies {
        out.push_str(
            "
## 🔗 Dependencies
### Blocked by:
- [ ] [Dependency 1 - what's needed first]

### Blocks:
- [ ] [What this blocks - other tickets waiting]
",
        );
    }

    out.push_str(
        "
## ✅ Acceptance Criteria
- [ ] [Criterion]
",
    );

    if sections.definition_of_done {
        out.push_str(
            "
## 🏁 Definition of Done
- [ ] Design matches Figma specs
- [ ] Responsive on all breakpoints
- [ ] Passes accessibility review
- [ ] Works with existing design system
- [ ] Developer handoff completed
- [ ] Stakeholder approval received
",
        );
    }

    if sections.resources {
        out.push_str(
            "
## 📎 Resources
**Design System:** [Link to design system]
**Related Tickets:** [Links to related GitLab issues]
**User Research:** [Link to research/user feedback if any]
",
        );
    }

    if sections.notes {
        out.push_str(
            "
## 💬 Notes & Context
[Anything else the team should know?]
",
        );
    }

    let _ = write!(out, "\n---\n*Created: {today_str} | Updated: {today_str}*\n");
    out
}

/// Fills `{{placeholder}}` tokens of a user-defined template.
pub fn render_custom(template: &CustomTemplate, settings: &Settings, today: NaiveDate) -> String {
    let replacements = [
        ("{{date}}", today.format(DATE_FORMAT).to_string()),
        ("{{due_date}}", due_date(today).format(DATE_FORMAT).to_string()),
        ("{{project_id}}", settings.default_project_id.trim().to_string()),
        ("{{assignee}}", settings.default_assignee.trim().to_string()),
        ("{{labels}}", settings.default_label_list().join(", ")),
        ("{{priority}}", settings.priority().to_string()),
    ];

    replacements
        .iter()
        .fold(template.content.clone(), |content, (token, value)| {
            content.replace(token, value)
        })
}

fn due_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(DUE_IN_DAYS)).unwrap_or(today)
}

fn bracketed(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("[{label}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
