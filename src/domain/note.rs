use std::sync::LazyLock;

use regex::Regex;

use crate::config::Settings;
use crate::domain::labels::union_labels;
use crate::domain::ticket::TicketMetadata;
use crate::error::AppResult;

const DELIMITER: &str = "---";

static STORY_POINTS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*story points:\*\*\s*\[([^\]\[]*)\]\s*$").expect("story points regex")
});
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digits regex"));

/// Raw fields recovered from a note. Every field is optional; see
/// [`TicketMetadata::from_note`] for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedNote {
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub story_points: Option<u32>,
    pub priority: Option<String>,
    pub project_id: Option<String>,
    pub summary: String,
    pub requirements: Vec<String>,
    pub acceptance_criteria: Vec<String>,
}

/// Body section the parser is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Other,
    Summary,
    Requirements,
    AcceptanceCriteria,
}

impl Section {
    /// `Some` for every `## ` heading line. Headings other than the three
    /// tracked ones reset to [`Section::Other`].
    pub fn transition(line: &str) -> Option<Section> {
        let heading = line.trim_end().strip_prefix("## ")?;
        let name = strip_decoration(heading).to_lowercase();
        let next = match name.as_str() {
            "summary" => Section::Summary,
            "requirements" => Section::Requirements,
            "acceptance criteria" => Section::AcceptanceCriteria,
            _ => Section::Other,
        };
        Some(next)
    }
}

pub fn parse_ticket(text: &str, settings: &Settings) -> AppResult<TicketMetadata> {
    TicketMetadata::from_note(parse_note(text), settings)
}

pub fn parse_note(text: &str) -> ParsedNote {
    let mut note = ParsedNote::default();

    let body = match split_front_matter(text) {
        Some((block, body)) => {
            apply_front_matter(&mut note, block);
            body
        }
        None => text,
    };

    let mut section = Section::Other;
    let mut summary_parts: Vec<&str> = Vec::new();
    let mut heading_title: Option<String> = None;
    let mut body_story_points: Option<u32> = None;

    for raw in body.lines() {
        let line = raw.trim_end();

        if heading_title.is_none() {
            if let Some(heading) = line.strip_prefix("# ") {
                heading_title = clean_title(strip_decoration(heading));
            }
        }

        if body_story_points.is_none() {
            body_story_points = story_points_from_line(line);
        }

        if let Some(next) = Section::transition(line) {
            section = next;
            continue;
        }

        let content = line.trim_start();
        match section {
            Section::Other => {}
            Section::Summary => {
                if !content.is_empty() && !content.starts_with('#') {
                    summary_parts.push(content);
                }
            }
            Section::Requirements => {
                if let Some(item) = content.strip_prefix("- ") {
                    push_non_empty(&mut note.requirements, item);
                }
            }
            Section::AcceptanceCriteria => {
                if let Some(item) = content.strip_prefix("- [ ]") {
                    push_non_empty(&mut note.acceptance_criteria, item);
                }
            }
        }
    }

    if note.title.is_none() {
        note.title = heading_title;
    }
    if note.story_points.is_none() {
        note.story_points = body_story_points;
    }
    note.summary = summary_parts.join(" ");
    note
}

/// Splits a leading `---` block from the rest of the note. Returns `None`
/// when the note does not open with a complete block.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut block_start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim_end();

        match block_start {
            None if trimmed.is_empty() => {}
            None if trimmed == DELIMITER => block_start = Some(offset),
            None => return None,
            Some(start) if trimmed == DELIMITER => {
                return Some((&text[start..line_start], &text[offset..]));
            }
            Some(_) => {}
        }
    }

    None
}

fn apply_front_matter(note: &mut ParsedNote, block: &str) {
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());

        match key.trim().to_ascii_lowercase().as_str() {
            "gitlab-project-id" => note.project_id = non_empty(value),
            "assignee" => note.assignee = non_empty(value),
            "labels" => note.labels = union_labels(&split_labels(value), &[]),
            "priority" => note.priority = non_empty(value),
            "story-points" => note.story_points = Some(leading_number(value).unwrap_or(0)),
            "title" => note.title = clean_title(value),
            _ => {}
        }
    }
}

fn split_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|label| label.replace(['[', ']'], ""))
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

fn story_points_from_line(line: &str) -> Option<u32> {
    let captures = STORY_POINTS_LINE.captures(line)?;
    let inner = captures.get(1)?.as_str();
    DIGITS.find(inner)?.as_str().parse().ok()
}

fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Drops leading emoji and other ornaments before the heading text.
fn strip_decoration(heading: &str) -> &str {
    heading
        .trim_start_matches(|c: char| !c.is_alphanumeric() && c != '[')
        .trim_end()
}

fn clean_title(value: &str) -> Option<String> {
    non_empty(&value.replace(['[', ']'], ""))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn push_non_empty(target: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() {
        target.push(item.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "---
gitlab-project-id: \"42\"
assignee: \"ada\"
labels: \"[UI], [Motion]\"
priority: 'high'
story-points: \"5\"
not a pair
---

# 🎨 [Checkout redesign]

## 📝 Summary
Simplify the checkout flow.
### Context
Users drop off at step two.

## Requirements
- Do X
- Do Y
not a list item

## Acceptance Criteria
- [ ] Done when Z
- [x] Already finished
  - [ ] Nested criterion

## Notes
- ignored
";

    #[test]
    fn parses_front_matter_and_sections() {
        let note = parse_note(NOTE);
        assert_eq!(note.project_id.as_deref(), Some("42"));
        assert_eq!(note.assignee.as_deref(), Some("ada"));
        assert_eq!(note.labels, vec!["UI", "Motion"]);
        assert_eq!(note.priority.as_deref(), Some("high"));
        assert_eq!(note.story_points, Some(5));
        assert_eq!(note.title.as_deref(), Some("Checkout redesign"));
        assert_eq!(
            note.summary,
            "Simplify the checkout flow. Users drop off at step two."
        );
        assert_eq!(note.requirements, vec!["Do X", "Do Y"]);
        assert_eq!(
            note.acceptance_criteria,
            vec!["Done when Z", "Nested criterion"]
        );
    }

    #[test]
    fn strips_quotes_from_project_id() {
        let note = parse_note("---\ngitlab-project-id: \"42\"\n---\n");
        assert_eq!(note.project_id.as_deref(), Some("42"));
    }

    #[test]
    fn collects_requirements() {
        let note = parse_note("## Requirements\n- Do X\n- Do Y");
        assert_eq!(note.requirements, vec!["Do X", "Do Y"]);
    }

    #[test]
    fn collects_acceptance_criteria() {
        let note = parse_note("## Acceptance Criteria\n- [ ] Done when Z");
        assert_eq!(note.acceptance_criteria, vec!["Done when Z"]);
    }

    #[test]
    fn front_matter_title_wins_over_heading() {
        let note = parse_note("---\ntitle: \"From meta\"\n---\n# From heading\n");
        assert_eq!(note.title.as_deref(), Some("From meta"));
    }

    #[test]
    fn first_heading_wins() {
        let note = parse_note("# First\n# Second\n");
        assert_eq!(note.title.as_deref(), Some("First"));
    }

    #[test]
    fn missing_heading_leaves_title_empty() {
        let note = parse_note("## Summary\nsomething\n");
        assert_eq!(note.title, None);
    }

    #[test]
    fn invalid_story_points_become_zero() {
        let note = parse_note("---\nstory-points: \"lots\"\n---\n");
        assert_eq!(note.story_points, Some(0));
    }

    #[test]
    fn story_points_fall_back_to_single_body_option() {
        let note = parse_note("**Story points:** [8 pts]  \n");
        assert_eq!(note.story_points, Some(8));

        let note = parse_note("**Story points:** [1 pt] [2 pts] [3 pts]\n");
        assert_eq!(note.story_points, None);
    }

    #[test]
    fn repeated_summary_headings_keep_collecting() {
        let note = parse_note("## Summary\none\n## Other\nskipped\n## Summary\ntwo\n");
        assert_eq!(note.summary, "one two");
    }

    #[test]
    fn requires_front_matter_at_top() {
        assert!(split_front_matter("# Title\n---\nkey: value\n---\n").is_none());
        assert!(split_front_matter("---\nkey: value\n").is_none());

        let (block, body) = split_front_matter("\r\n---\r\nkey: value\r\n---\r\nbody").expect("split");
        assert_eq!(block, "key: value\r\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn transitions_on_level_two_headings_only() {
        assert_eq!(Section::transition("## Summary"), Some(Section::Summary));
        assert_eq!(
            Section::transition("## 📌 requirements "),
            Some(Section::Requirements)
        );
        assert_eq!(
            Section::transition("## ✅ Acceptance Criteria"),
            Some(Section::AcceptanceCriteria)
        );
        assert_eq!(Section::transition("## 💡 Proposed Solution"), Some(Section::Other));
        assert_eq!(Section::transition("### Summary"), None);
        assert_eq!(Section::transition("Summary"), None);
    }

    #[test]
    fn parse_ticket_validates() {
        let settings = Settings::default();
        let metadata = parse_ticket(NOTE, &settings).expect("metadata");
        assert_eq!(metadata.title, "Checkout redesign");
        assert_eq!(metadata.project_id, "42");

        assert!(parse_ticket("## Summary\ntext\n", &settings).is_err());
    }
}
