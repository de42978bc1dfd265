use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::ticket::{TicketWorkflowOutcome, create_ticket_from_note};

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Design ticket note to submit.
    pub note: PathBuf,
    /// Do not open the created issue in a browser.
    #[arg(long)]
    pub no_browser: bool,
}

pub async fn run(ctx: &AppContext, args: SubmitArgs) -> AppResult<TicketWorkflowOutcome> {
    let note = fs::read_to_string(&args.note)?;
    create_ticket_from_note(ctx, &note, !args.no_browser).await
}
