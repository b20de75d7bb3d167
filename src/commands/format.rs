//! Handler for the `format` command.

use anyhow::Result;
use colored::*;
use std::io::Write;
use tidybridge_lib::exit_codes::{TOOL_ERROR, status_for};
use tidybridge_lib::sink::ConsoleNotifier;
use tidybridge_lib::{ConfigStore, FormatSession, IssueCollection, TidyOutcome};

use crate::cli_types::FormatArgs;
use crate::file_processor::{Input, ProcessError, collect_inputs, process_input};
use crate::formatter::{Reporter, generate_diff};

/// Format files in place, or stdin to stdout. Returns the exit code.
pub async fn handle_format(store: ConfigStore, args: &FormatArgs) -> Result<i32> {
    let inputs = collect_inputs(&args.run.paths)?;
    if args.selection.is_some() && inputs.len() != 1 {
        anyhow::bail!("--selection needs exactly one input, got {}", inputs.len());
    }

    let write_back = !args.check && !args.diff;
    let stdin_filename = args.run.stdin_filename.as_deref();
    let mut reporter = Reporter::new(&args.run)?;
    let mut session = FormatSession::new(store, IssueCollection::new(), ConsoleNotifier::new(args.run.quiet));

    let mut reformatted = 0;
    let mut tool_errors = 0;

    for input in &inputs {
        let processed = match process_input(&mut session, input, stdin_filename, args.selection.clone()).await {
            Ok(processed) => processed,
            Err(e) if e.is_fatal() => return Ok(TOOL_ERROR),
            Err(ProcessError::Input(e)) => {
                eprintln!("{}: {e:#}", "Error".red().bold());
                tool_errors += 1;
                continue;
            }
            // Already shown by the session's notifier
            Err(ProcessError::Format(_)) => {
                tool_errors += 1;
                continue;
            }
        };

        let issues = session.sink().issues(processed.document.key());
        reporter.file_done(&processed.name, issues, &processed.original)?;
        if matches!(processed.outcome, TidyOutcome::Failed { .. }) {
            continue;
        }

        // Stdin is echoed even when unchanged, so the output is always the tidied text
        let echo_stdin = write_back && *input == Input::Stdin;
        if !processed.changed() && !echo_stdin {
            continue;
        }
        if processed.changed() {
            reformatted += 1;
        }

        match (input, write_back) {
            (Input::Stdin, true) => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(processed.document.text().as_bytes())?;
                stdout.flush()?;
            }
            (Input::File(path), true) => {
                std::fs::write(path, processed.document.text())?;
                reporter.status(&format!("Reformatted: {}", processed.name));
            }
            (_, false) if args.diff => {
                print!(
                    "{}",
                    generate_diff(&processed.original, processed.document.text(), &processed.name)
                );
            }
            (_, false) => reporter.status(&format!("Would reformat: {}", processed.name)),
        }
    }

    let total_issues = reporter.total_issues();
    reporter.finish()?;

    let would_reformat = if write_back { 0 } else { reformatted };
    Ok(status_for(tool_errors, total_issues, would_reformat))
}
