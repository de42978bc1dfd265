use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use crate::config::{CustomTemplate, Settings};
use crate::domain::template::{TemplateSections, note_file_name, render_custom, render_template};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Use a saved custom template instead of the built-in one.
    #[arg(short, long)]
    pub template: Option<String>,
    /// Only the summary, problem, solution, requirements and acceptance criteria sections.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Directory the note is created in.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
    #[command(flatten)]
    pub template: TemplateArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TemplatesCommand {
    /// List saved custom templates.
    List,
    /// Save a custom template; content is read from FILE or stdin.
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        category: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a custom template.
    Remove { name: String },
}

/// Writes a new dated note and returns its path.
pub fn run_new(settings: &Settings, args: NewArgs) -> AppResult<PathBuf> {
    let today = Local::now().date_naive();
    let content = render(settings, &args.template, today)?;
    create_note(&args.dir, today, &content)
}

/// Returns the template text for insertion into an existing note.
pub fn run_print(settings: &Settings, args: TemplateArgs) -> AppResult<String> {
    render(settings, &args, Local::now().date_naive())
}

pub fn run_manage(command: TemplatesCommand) -> AppResult<()> {
    match command {
        TemplatesCommand::List => {
            let settings = Settings::load_stored()?;
            if settings.custom_templates.is_empty() {
                println!("No custom templates saved.");
            }
            for template in &settings.custom_templates {
                if template.category.is_empty() {
                    println!("{}", template.name);
                } else {
                    println!("{} ({})", template.name, template.category);
                }
            }
            Ok(())
        }
        TemplatesCommand::Add {
            name,
            category,
            file,
        } => {
            let content = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut input = String::new();
                    io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Configuration(
                    "template name must not be empty".to_string(),
                ));
            }

            let mut settings = Settings::load_stored()?;
            settings.upsert_template(CustomTemplate {
                name: name.clone(),
                content,
                category: category.trim().to_string(),
            });
            settings.save()?;
            println!("Template '{name}' saved.");
            Ok(())
        }
        TemplatesCommand::Remove { name } => {
            let mut settings = Settings::load_stored()?;
            if !settings.remove_template(&name) {
                return Err(AppError::Configuration(format!(
                    "no template named '{name}'"
                )));
            }
            settings.save()?;
            println!("Template '{name}' removed.");
            Ok(())
        }
    }
}

fn render(settings: &Settings, args: &TemplateArgs, today: NaiveDate) -> AppResult<String> {
    if let Some(name) = &args.template {
        let template = settings
            .find_template(name)
            .ok_or_else(|| AppError::Configuration(format!("no template named '{name}'")))?;
        return Ok(render_custom(template, settings, today));
    }

    let sections = if args.compact {
        TemplateSections::compact()
    } else {
        TemplateSections::detailed()
    };
    Ok(render_template(settings, today, &sections))
}

fn create_note(dir: &Path, today: NaiveDate, content: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(note_file_name(today));
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => AppError::Io(io::Error::new(
                err.kind(),
                format!("{} already exists", path.display()),
            )),
            _ => AppError::Io(err),
        })?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}
