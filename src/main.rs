mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::template::{self, NewArgs, TemplateArgs, TemplatesArgs};
use crate::cmd::ticket::{self, SubmitArgs};
use crate::config::Settings;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "dticket",
    author,
    version,
    about = "Write design tickets as markdown notes and file them as GitLab issues"
)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new dated design ticket note.
    New(NewArgs),
    /// Print a design ticket template to stdout.
    Template(TemplateArgs),
    /// Manage saved custom templates.
    Templates(TemplatesArgs),
    /// Create a GitLab issue from a design ticket note.
    Submit(SubmitArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command).await,
        Commands::Templates(args) => template::run_manage(args.command),
        Commands::New(args) => {
            let settings = Settings::load()?;
            let path = template::run_new(&settings, args)?;
            println!("Design ticket created: {}", path.display());
            Ok(())
        }
        Commands::Template(args) => {
            let settings = Settings::load()?;
            print!("{}", template::run_print(&settings, args)?);
            Ok(())
        }
        Commands::Submit(args) => run_submit(args).await,
    }
}

async fn run_submit(args: SubmitArgs) -> AppResult<()> {
    let settings = Settings::load()?;
    if settings.default_labels.trim().is_empty() {
        eprintln!("Warning: no default labels configured; only note labels will be sent.");
    }

    let context = AppContext::from_settings(settings)?;
    let outcome = ticket::run(&context, args).await?;

    println!(
        "GitLab issue #{} created: {}",
        outcome.issue.iid, outcome.metadata.title
    );
    println!("Summary: {}", outcome.metadata.summary);
    println!(
        "Requirements: {}, acceptance criteria: {}",
        outcome.metadata.requirements.len(),
        outcome.metadata.acceptance_criteria.len()
    );
    println!("Labels: {}", outcome.labels.join(", "));
    match &outcome.metadata.assignee {
        Some(assignee) if outcome.assigned => println!("Assignee: {assignee}"),
        Some(assignee) => println!("Assignee: {assignee} (not found, left unassigned)"),
        None => {}
    }
    if !outcome.browser_opened {
        println!("View issue: {}", outcome.issue.web_url);
    }

    Ok(())
}
