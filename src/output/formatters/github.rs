//! GitHub Actions annotation format

use crate::diagnostics::Issue;
use crate::output::OutputFormatter;

/// GitHub Actions formatter
/// Outputs in the format: ::error file=<file>,line=<line>,col=<col>,endColumn=<end>,title=perltidy::<message>
#[derive(Default)]
pub struct GitHubFormatter;

impl GitHubFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// Escape a value for a workflow command property.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

impl OutputFormatter for GitHubFormatter {
    fn format_issues(&self, issues: &[Issue], file_path: &str) -> String {
        let mut output = String::new();

        for issue in issues {
            let mut properties = format!("file={},line={}", escape_property(file_path), issue.line);
            if let Some(column) = issue.column {
                properties.push_str(&format!(",col={}", column + 1));
            }
            if let Some(end_column) = issue.end_column {
                properties.push_str(&format!(",endColumn={}", end_column + 1));
            }
            properties.push_str(&format!(",title={}", escape_property(&issue.source)));

            output.push_str(&format!("::error {properties}::{}\n", escape_data(&issue.message)));
        }

        // Remove trailing newline
        if output.ends_with('\n') {
            output.pop();
        }

        output
    }
}
