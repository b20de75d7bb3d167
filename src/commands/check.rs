//! Handler for the `check` command.

use anyhow::Result;
use colored::*;
use tidybridge_lib::exit_codes::{TOOL_ERROR, status_for};
use tidybridge_lib::sink::ConsoleNotifier;
use tidybridge_lib::{ConfigStore, FormatSession, IssueCollection};

use crate::cli_types::RunArgs;
use crate::file_processor::{ProcessError, collect_inputs, process_input};
use crate::formatter::Reporter;

/// Run perltidy over every input and report issues without writing anything.
/// Returns the exit code.
pub async fn handle_check(store: ConfigStore, args: &RunArgs) -> Result<i32> {
    let inputs = collect_inputs(&args.paths)?;
    let stdin_filename = args.stdin_filename.as_deref();
    let mut reporter = Reporter::new(args)?;
    // The failure notice is meant for editors; the issues themselves are printed here
    let mut session = FormatSession::new(store, IssueCollection::new(), ConsoleNotifier::new(true));
    let mut tool_errors = 0;

    for input in &inputs {
        match process_input(&mut session, input, stdin_filename, None).await {
            Ok(processed) => {
                let issues = session.sink().issues(processed.document.key());
                reporter.file_done(&processed.name, issues, &processed.original)?;
            }
            Err(e) if e.is_fatal() => return Ok(TOOL_ERROR),
            Err(ProcessError::Input(e)) => {
                eprintln!("{}: {e:#}", "Error".red().bold());
                tool_errors += 1;
            }
            Err(ProcessError::Format(_)) => tool_errors += 1,
        }
    }

    let total_issues = reporter.total_issues();
    reporter.finish()?;

    Ok(status_for(tool_errors, total_issues, 0))
}
