use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "design-ticket";
const CONFIG_FILE_NAME: &str = "settings.json";
const CONFIG_PATH_ENV: &str = "DTICKET_CONFIG_FILE";
const TOKEN_ENV: &str = "DTICKET_GITLAB_TOKEN";

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_PRIORITY: &str = "medium";

/// Persisted settings. Keys absent from the file fall back to [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub gitlab_url: String,
    pub gitlab_token: String,
    pub default_project_id: String,
    pub default_assignee: String,
    pub default_labels: String,
    pub default_priority: String,
    pub story_point_labels: Vec<String>,
    pub category_labels: Vec<String>,
    pub priority_labels: Vec<String>,
    pub custom_templates: Vec<CustomTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTemplate {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gitlab_url: DEFAULT_GITLAB_URL.to_string(),
            gitlab_token: String::new(),
            default_project_id: String::new(),
            default_assignee: String::new(),
            default_labels: "design".to_string(),
            default_priority: DEFAULT_PRIORITY.to_string(),
            story_point_labels: to_strings(&["1 pt", "2 pts", "3 pts", "5 pts", "8 pts", "13 pts"]),
            category_labels: to_strings(&["UI", "UX", "Research", "Design System"]),
            priority_labels: to_strings(&["low", "medium", "high", "urgent"]),
            custom_templates: Vec::new(),
        }
    }
}

/// A scalar setting addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    GitlabUrl,
    GitlabToken,
    DefaultProjectId,
    DefaultAssignee,
    DefaultLabels,
    DefaultPriority,
}

impl SettingKey {
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gitlab-url" => Ok(SettingKey::GitlabUrl),
            "gitlab-token" => Ok(SettingKey::GitlabToken),
            "default-project-id" => Ok(SettingKey::DefaultProjectId),
            "default-assignee" => Ok(SettingKey::DefaultAssignee),
            "default-labels" => Ok(SettingKey::DefaultLabels),
            "default-priority" => Ok(SettingKey::DefaultPriority),
            other => Err(AppError::Configuration(format!(
                "unknown setting '{other}'"
            ))),
        }
    }
}

/// Which label vocabulary a multi-line edit replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelList {
    StoryPoints,
    Categories,
    Priorities,
}

impl Settings {
    /// Stored settings with the token environment override applied.
    pub fn load() -> AppResult<Self> {
        let mut settings = Self::load_stored()?;
        if let Ok(token) = env::var(TOKEN_ENV) {
            let token = token.trim();
            if !token.is_empty() {
                settings.gitlab_token = token.to_string();
            }
        }
        Ok(settings)
    }

    /// Stored settings only; use this before writing back.
    pub fn load_stored() -> AppResult<Self> {
        Self::load_from_path(&config_file_path()?)
    }

    pub fn load_from_path(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Self::default()),
            Ok(contents) => serde_json::from_str::<Settings>(&contents).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid settings file {}: {err}",
                    path.display()
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<PathBuf> {
        let path = config_file_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write settings: {err}")))?;
        fs::write(path, data)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn set(&mut self, key: SettingKey, value: &str) {
        let value = value.trim().to_string();
        match key {
            SettingKey::GitlabUrl => self.gitlab_url = value,
            SettingKey::GitlabToken => self.gitlab_token = value,
            SettingKey::DefaultProjectId => self.default_project_id = value,
            SettingKey::DefaultAssignee => self.default_assignee = value,
            SettingKey::DefaultLabels => self.default_labels = value,
            SettingKey::DefaultPriority => self.default_priority = value,
        }
    }

    /// Replaces a vocabulary from free text, one entry per line.
    pub fn replace_labels(&mut self, list: LabelList, text: &str) {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        match list {
            LabelList::StoryPoints => self.story_point_labels = entries,
            LabelList::Categories => self.category_labels = entries,
            LabelList::Priorities => self.priority_labels = entries,
        }
    }

    pub fn labels(&self, list: LabelList) -> &[String] {
        match list {
            LabelList::StoryPoints => &self.story_point_labels,
            LabelList::Categories => &self.category_labels,
            LabelList::Priorities => &self.priority_labels,
        }
    }

    pub fn default_label_list(&self) -> Vec<String> {
        self.default_labels
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn token(&self) -> Option<&str> {
        non_empty(&self.gitlab_token)
    }

    pub fn project_id(&self) -> Option<&str> {
        non_empty(&self.default_project_id)
    }

    pub fn priority(&self) -> &str {
        non_empty(&self.default_priority).unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn base_url(&self) -> String {
        let url = self.gitlab_url.trim().trim_end_matches('/');
        if url.is_empty() {
            DEFAULT_GITLAB_URL.to_string()
        } else {
            url.to_string()
        }
    }

    pub fn find_template(&self, name: &str) -> Option<&CustomTemplate> {
        self.custom_templates
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Adds a template, replacing any existing one with the same name.
    pub fn upsert_template(&mut self, template: CustomTemplate) {
        self.custom_templates
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&template.name));
        self.custom_templates.push(template);
    }

    pub fn remove_template(&mut self, name: &str) -> bool {
        let before = self.custom_templates.len();
        self.custom_templates
            .retain(|existing| !existing.name.eq_ignore_ascii_case(name.trim()));
        self.custom_templates.len() != before
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        AppError::Configuration("could not determine the user config directory".to_string())
    })?;
    Ok(base.join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    if let Some(override_path) = env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("temp dir");
        let settings = Settings::load_from_path(&dir.path().join("nope.json")).expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_url(), "https://gitlab.com");
        assert_eq!(settings.priority(), "medium");
    }

    #[test]
    fn merges_defaults_for_absent_keys() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"gitlabUrl": "https://git.example.com/", "defaultProjectId": "42"}"#,
        )
        .expect("write");

        let settings = Settings::load_from_path(&path).expect("settings");
        assert_eq!(settings.base_url(), "https://git.example.com");
        assert_eq!(settings.project_id(), Some("42"));
        assert_eq!(settings.default_labels, "design");
        assert_eq!(settings.priority_labels.len(), 4);
    }

    #[test]
    fn rejects_malformed_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");

        let err = Settings::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn saves_and_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.set(SettingKey::GitlabToken, "  glpat-secret ");
        settings.upsert_template(CustomTemplate {
            name: "Bug".to_string(),
            content: "# {{date}}".to_string(),
            category: "qa".to_string(),
        });
        settings.save_to_path(&path).expect("save");

        let reloaded = Settings::load_from_path(&path).expect("reload");
        assert_eq!(reloaded.token(), Some("glpat-secret"));
        assert_eq!(reloaded.custom_templates.len(), 1);

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"gitlabToken\""));
        assert!(raw.contains("\"customTemplates\""));
    }

    #[test]
    fn replaces_label_list_dropping_blank_lines() {
        let mut settings = Settings::default();
        settings.replace_labels(LabelList::Categories, "Motion\n\n  Icons  \n\r\n");
        assert_eq!(
            settings.labels(LabelList::Categories).to_vec(),
            vec!["Motion", "Icons"]
        );
    }

    #[test]
    fn splits_default_labels() {
        let mut settings = Settings::default();
        settings.set(SettingKey::DefaultLabels, "design, ui,,ux ");
        assert_eq!(settings.default_label_list(), vec!["design", "ui", "ux"]);
    }

    #[test]
    fn parses_setting_keys() {
        assert_eq!(
            SettingKey::parse("Default-Project-Id").expect("key"),
            SettingKey::DefaultProjectId
        );
        assert!(SettingKey::parse("colour").is_err());
    }

    #[test]
    fn template_names_are_case_insensitive() {
        let mut settings = Settings::default();
        settings.upsert_template(CustomTemplate {
            name: "Bug".to_string(),
            content: "one".to_string(),
            category: String::new(),
        });
        settings.upsert_template(CustomTemplate {
            name: "bug".to_string(),
            content: "two".to_string(),
            category: String::new(),
        });
        assert_eq!(settings.custom_templates.len(), 1);
        assert_eq!(settings.find_template("BUG").map(|t| t.content.as_str()), Some("two"));
        assert!(settings.remove_template("Bug"));
        assert!(!settings.remove_template("Bug"));
    }
}
