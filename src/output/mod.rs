//! Output formatting for issues found by perltidy.

use crate::diagnostics::Issue;
use std::io::{self, Write};

pub mod formatters;

pub use formatters::*;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the issues reported for one file
    fn format_issues(&self, issues: &[Issue], file_path: &str) -> String;

    /// Format issues with the file's source available for context
    fn format_issues_with_content(&self, issues: &[Issue], file_path: &str, _content: &str) -> String {
        self.format_issues(issues, file_path)
    }

    /// Format a summary of results across multiple files
    fn format_summary(&self, _files_processed: usize, _total_issues: usize, _duration_ms: u64) -> Option<String> {
        None
    }

    /// Whether this formatter should use colors
    fn use_colors(&self) -> bool {
        false
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with the offending source line and carets
    Text,
    /// Concise format: file:line:col: message
    Concise,
    /// JSON array of issues
    Json,
    /// GitHub Actions annotation format
    GitHub,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "full" => Ok(OutputFormat::Text),
            "concise" => Ok(OutputFormat::Concise),
            "json" => Ok(OutputFormat::Json),
            "github" => Ok(OutputFormat::GitHub),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    /// Create a formatter instance for this format
    pub fn create_formatter(&self, use_colors: bool) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text if use_colors => Box::new(TextFormatter::new()),
            OutputFormat::Text => Box::new(TextFormatter::without_colors()),
            OutputFormat::Concise => Box::new(ConciseFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::GitHub => Box::new(GitHubFormatter::new()),
        }
    }
}

/// 1-based `line:column` (or just `line`) for display.
pub fn location(issue: &Issue) -> String {
    match issue.column {
        Some(column) => format!("{}:{}", issue.line, column + 1),
        None => issue.line.to_string(),
    }
}

/// Output writer that handles stdout/stderr routing
pub struct OutputWriter {
    use_stderr: bool,
    silent: bool,
}

impl OutputWriter {
    pub fn new(use_stderr: bool, silent: bool) -> Self {
        Self { use_stderr, silent }
    }

    /// Write a line to the configured stream
    pub fn writeln(&self, content: &str) -> io::Result<()> {
        if self.silent || content.is_empty() {
            return Ok(());
        }

        if self.use_stderr {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{content}")?;
            stderr.flush()
        } else {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{content}")?;
            stdout.flush()
        }
    }
}
