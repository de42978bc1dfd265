use std::sync::LazyLock;

use regex::Regex;

use crate::domain::note::split_front_matter;

static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("link regex"));
static TASK_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]*\[ \][ \t]*").expect("task regex"));

/// Turns a note into an issue description: front-matter removed, links
/// reduced to their text, task items normalised to `- [ ] `.
pub fn issue_description(note: &str) -> String {
    let body = split_front_matter(note)
        .map(|(_, body)| body)
        .unwrap_or(note)
        .trim_start_matches(['\r', '\n']);

    let without_links = INTERNAL_LINK.replace_all(body, "[$1]");
    TASK_ITEM
        .replace_all(&without_links, "- [ ] ")
        .into_owned()
}
