/// Ordered union without duplicates; first occurrence wins.
pub fn union_labels(first: &[String], second: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for label in first.iter().chain(second) {
        let label = label.trim();
        if !label.is_empty() && !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

pub fn story_points_label(story_points: u32) -> Option<String> {
    (story_points > 0).then(|| format!("{story_points} Story Points"))
}

pub fn priority_label(priority: &str) -> String {
    format!("Priority: {}", priority.trim())
}

/// Labels sent with a new issue: note labels, configured defaults, then the
/// synthetic story-point and priority labels.
pub fn compose_labels(
    note_labels: &[String],
    default_labels: &[String],
    story_points: u32,
    priority: &str,
) -> Vec<String> {
    let mut labels = union_labels(note_labels, default_labels);
    let synthetic = story_points_label(story_points)
        .into_iter()
        .chain(std::iter::once(priority_label(priority)));
    for label in synthetic {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
