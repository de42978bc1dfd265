use std::io::{self, Read, Write};

use clap::{Args, Subcommand, ValueEnum};

use crate::config::{LabelList, SettingKey, Settings, config_file_path};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::connection::test_connection;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (token masked).
    Show,
    /// Set one value, e.g. `config set default-project-id 42`.
    Set {
        /// gitlab-url, gitlab-token, default-project-id, default-assignee, default-labels or default-priority.
        key: String,
        value: String,
    },
    /// Replace a label list with lines read from stdin (blank lines are ignored).
    Labels {
        #[arg(value_enum)]
        list: LabelListArg,
    },
    /// Check that the token can read the default project.
    Test,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LabelListArg {
    StoryPoints,
    Categories,
    Priorities,
}

impl From<LabelListArg> for LabelList {
    fn from(arg: LabelListArg) -> Self {
        match arg {
            LabelListArg::StoryPoints => LabelList::StoryPoints,
            LabelListArg::Categories => LabelList::Categories,
            LabelListArg::Priorities => LabelList::Priorities,
        }
    }
}

pub async fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
        ConfigCommand::Set { key, value } => run_set(&key, &value),
        ConfigCommand::Labels { list } => run_labels(list.into()),
        ConfigCommand::Test => run_test().await,
    }
}

async fn run_test() -> AppResult<()> {
    let ctx = AppContext::from_settings(Settings::load()?)?;
    let project = test_connection(&ctx).await?;
    println!("GitLab connection successful: {}", project.name);
    if let Some(url) = &project.web_url {
        println!("Project: {url}");
    }
    Ok(())
}

fn run_init() -> AppResult<()> {
    let mut cfg = Settings::load_stored()?;

    println!("Configuring dticket.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The token is stored in the local settings file; protect your filesystem accordingly.");
    println!();

    apply_prompt("GitLab URL (e.g., https://gitlab.com)", &mut cfg.gitlab_url, false)?;
    apply_prompt("GitLab personal access token (api scope)", &mut cfg.gitlab_token, true)?;
    apply_prompt("Default project id", &mut cfg.default_project_id, false)?;
    apply_prompt("Default assignee (GitLab username)", &mut cfg.default_assignee, false)?;
    apply_prompt("Default labels (comma-separated)", &mut cfg.default_labels, false)?;
    apply_prompt("Default priority (low/medium/high/urgent)", &mut cfg.default_priority, false)?;

    let path = cfg.save()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = Settings::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("GitLab URL: {}", display_value(&cfg.gitlab_url));
    println!("GitLab token: {}", mask_secret(&cfg.gitlab_token));
    println!("Default project id: {}", display_value(&cfg.default_project_id));
    println!("Default assignee: {}", display_value(&cfg.default_assignee));
    println!("Default labels: {}", display_value(&cfg.default_labels));
    println!("Default priority: {}", display_value(&cfg.default_priority));
    println!("Story point labels: {}", display_list(&cfg.story_point_labels));
    println!("Category labels: {}", display_list(&cfg.category_labels));
    println!("Priority labels: {}", display_list(&cfg.priority_labels));
    println!("Custom templates: {}", cfg.custom_templates.len());

    Ok(())
}

fn run_set(key: &str, value: &str) -> AppResult<()> {
    let key = SettingKey::parse(key)?;
    let mut cfg = Settings::load_stored()?;
    cfg.set(key, value);
    let path = cfg.save()?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn run_labels(list: LabelList) -> AppResult<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let mut cfg = Settings::load_stored()?;
    cfg.replace_labels(list, &input);
    let path = cfg.save()?;
    println!(
        "Saved {} labels to {}",
        cfg.labels(list).len(),
        path.display()
    );
    Ok(())
}

fn apply_prompt(field: &str, target: &mut String, secret: bool) -> AppResult<()> {
    let current = Some(target.as_str()).filter(|value| !value.trim().is_empty());
    match prompt(field, current, secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => target.clear(),
        PromptAction::Set(value) => *target = value,
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &str) -> String {
    if value.trim().is_empty() {
        "<not set>".to_string()
    } else {
        value.to_string()
    }
}

fn display_list(values: &[String]) -> String {
    if values.is_empty() {
        "<none>".to_string()
    } else {
        values.join(", ")
    }
}

fn mask_secret(value: &str) -> String {
    let token = value.trim();
    match token.chars().count() {
        0 => "<not set>".to_string(),
        1..=6 => "***".to_string(),
        len => {
            let prefix: String = token.chars().take(3).collect();
            let suffix: String = token.chars().skip(len - 3).collect();
            format!("{prefix}***{suffix}")
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_tokens() {
        assert_eq!(mask_secret(""), "<not set>");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("glpat-1234567"), "glp***567");
    }

    #[test]
    fn interprets_prompt_input() {
        assert_eq!(PromptAction::from_input("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::from_input(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::from_input(" https://git.example.com\n"),
            PromptAction::Set("https://git.example.com".to_string())
        );
    }
}
