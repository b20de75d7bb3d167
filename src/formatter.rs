//! Reporting helpers for the CLI

use anyhow::Result;
use colored::*;
use std::str::FromStr;
use std::time::Instant;
use tidybridge_lib::Issue;
use tidybridge_lib::output::{OutputFormat, OutputFormatter, OutputWriter, format_all_issues_as_json};

use crate::cli_types::RunArgs;

/// Prints issues as files are processed, in the requested output format
pub struct Reporter {
    format: OutputFormat,
    formatter: Box<dyn OutputFormatter>,
    writer: OutputWriter,
    collected: Vec<(String, Vec<Issue>)>,
    files_processed: usize,
    total_issues: usize,
    quiet: bool,
    start: Instant,
}

impl Reporter {
    pub fn new(args: &RunArgs) -> Result<Self> {
        let format = OutputFormat::from_str(&args.output_format).map_err(anyhow::Error::msg)?;
        Ok(Self {
            format,
            formatter: format.create_formatter(true),
            writer: OutputWriter::new(args.stderr, false),
            collected: Vec::new(),
            files_processed: 0,
            total_issues: 0,
            quiet: args.quiet,
            start: Instant::now(),
        })
    }

    pub fn total_issues(&self) -> usize {
        self.total_issues
    }

    /// Record one processed file and print its issues, if any.
    pub fn file_done(&mut self, file_path: &str, issues: &[Issue], content: &str) -> Result<()> {
        self.files_processed += 1;
        self.total_issues += issues.len();
        if issues.is_empty() {
            return Ok(());
        }

        if self.format == OutputFormat::Json {
            self.collected.push((file_path.to_string(), issues.to_vec()));
            return Ok(());
        }
        self.writer
            .writeln(&self.formatter.format_issues_with_content(issues, file_path, content))?;
        Ok(())
    }

    /// Print a status line unless quiet or producing machine-readable output.
    pub fn status(&self, message: &str) {
        if !self.quiet && self.format == OutputFormat::Text {
            eprintln!("{message}");
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", format_all_issues_as_json(&self.collected));
            return Ok(());
        }
        if !self.quiet
            && let Some(summary) = self.formatter.format_summary(
                self.files_processed,
                self.total_issues,
                self.start.elapsed().as_millis() as u64,
            )
        {
            eprintln!("{summary}");
        }
        Ok(())
    }
}

/// Generate a unified-style diff between the original and the tidied content
pub fn generate_diff(original: &str, modified: &str, file_path: &str) -> String {
    let mut diff = String::new();

    diff.push_str(&format!("--- {file_path}\n"));
    diff.push_str(&format!("+++ {file_path} (tidied)\n"));

    let original_lines: Vec<&str> = original.lines().collect();
    let modified_lines: Vec<&str> = modified.lines().collect();

    // Line-by-line comparison; perltidy rarely moves lines far
    let max_lines = original_lines.len().max(modified_lines.len());
    let mut in_diff_block = false;
    let mut diff_start = 0;
    let mut changes = Vec::new();

    for i in 0..max_lines {
        let orig_line = original_lines.get(i).copied();
        let mod_line = modified_lines.get(i).copied();

        if orig_line != mod_line {
            if !in_diff_block {
                in_diff_block = true;
                diff_start = i.saturating_sub(3);
            }
        } else if in_diff_block {
            let diff_end = (i + 3).min(max_lines);
            changes.push((diff_start, diff_end));
            in_diff_block = false;
        }
    }

    if in_diff_block {
        changes.push((diff_start, max_lines));
    }

    if changes.is_empty() {
        diff.push_str("No changes\n");
        return diff;
    }

    for (start, end) in merge_overlapping(changes) {
        diff.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            start + 1,
            end - start,
            start + 1,
            end - start
        ));

        for i in start..end {
            match (original_lines.get(i), modified_lines.get(i)) {
                (Some(orig), Some(modified)) if orig == modified => diff.push_str(&format!(" {orig}\n")),
                (orig, modified) => {
                    if let Some(orig) = orig {
                        diff.push_str(&format!("{}\n", format!("-{orig}").red()));
                    }
                    if let Some(modified) = modified {
                        diff.push_str(&format!("{}\n", format!("+{modified}").green()));
                    }
                }
            }
        }
    }

    diff
}

/// Join hunks whose context windows touch.
fn merge_overlapping(changes: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(changes.len());
    for (start, end) in changes {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
