//! Default text output formatter with colors and source context

use crate::diagnostics::Issue;
use crate::output::{OutputFormatter, location};
use colored::*;
use unicode_width::UnicodeWidthChar;

/// Human-readable formatter that shows the offending source line with carets
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, issue: &Issue, file_path: &str) -> String {
        format!(
            "{}:{}: {} {}",
            self.paint(file_path, |s| s.blue().underline()),
            self.paint(&location(issue), |s| s.cyan()),
            self.paint(&format!("[{}]", issue.source), |s| s.red()),
            issue.message
        )
    }

    /// Gutter, source line and caret underline for an issue with a known column.
    fn render_source_context(&self, output: &mut String, issue: &Issue, lines: &[&str]) {
        let Some(column) = issue.column else {
            return;
        };
        let Some(source_line) = lines.get(issue.line.saturating_sub(1)) else {
            return;
        };

        let gutter_width = issue.line.to_string().len().max(2);
        let empty_gutter = " ".repeat(gutter_width);
        let bar = self.paint("|", |s| s.blue().bold());

        let padding = caret_padding(source_line, column);
        let caret_len = match issue.end_column {
            Some(end) if end > column => end - column + 1,
            _ => 1,
        };
        let carets = self.paint(&"^".repeat(caret_len), |s| s.yellow().bold());

        output.push_str(&format!("{empty_gutter} {bar}\n"));
        output.push_str(&format!(
            "{:>width$} {bar} {source_line}\n",
            self.paint(&issue.line.to_string(), |s| s.blue().bold()),
            width = gutter_width
        ));
        output.push_str(&format!("{empty_gutter} {bar} {padding}{carets}\n"));
    }
}

/// Whitespace that lines a caret up under character `column` of `line`.
///
/// Tabs are kept as tabs so the terminal expands them the same way on both lines.
fn caret_padding(line: &str, column: usize) -> String {
    line.chars()
        .take(column)
        .map(|c| match c {
            '\t' => "\t".to_string(),
            c => " ".repeat(c.width().unwrap_or(0)),
        })
        .collect()
}

impl OutputFormatter for TextFormatter {
    fn format_issues(&self, issues: &[Issue], file_path: &str) -> String {
        issues
            .iter()
            .map(|issue| self.header(issue, file_path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_issues_with_content(&self, issues: &[Issue], file_path: &str, content: &str) -> String {
        let lines: Vec<&str> = content.lines().collect();
        let mut output = String::new();

        for issue in issues {
            output.push_str(&self.header(issue, file_path));
            output.push('\n');
            self.render_source_context(&mut output, issue, &lines);
        }

        // Remove trailing newline
        if output.ends_with('\n') {
            output.pop();
        }

        output
    }

    fn format_summary(&self, files_processed: usize, total_issues: usize, duration_ms: u64) -> Option<String> {
        let files = if files_processed == 1 { "file" } else { "files" };
        let summary = if total_issues == 0 {
            self.paint(&format!("Success: no issues in {files_processed} {files}"), |s| {
                s.green().bold()
            })
        } else {
            let issues = if total_issues == 1 { "issue" } else { "issues" };
            self.paint(
                &format!("Found {total_issues} {issues} in {files_processed} {files}"),
                |s| s.red().bold(),
            )
        };
        Some(format!("{summary} ({duration_ms}ms)"))
    }

    fn use_colors(&self) -> bool {
        self.use_colors
    }
}
