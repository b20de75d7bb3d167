//! Concise output formatter for easy parsing by editors

use crate::diagnostics::Issue;
use crate::output::{OutputFormatter, location};

/// Concise formatter: file:line:col: message
#[derive(Default)]
pub struct ConciseFormatter;

impl ConciseFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for ConciseFormatter {
    fn format_issues(&self, issues: &[Issue], file_path: &str) -> String {
        issues
            .iter()
            .map(|issue| format!("{file_path}:{}: {}", location(issue), issue.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::extract;

    #[test]
    fn test_concise_lines() {
        let mut issues = extract("<stdin>: 3: Missing semicolon\n<stdin>: 9: Unbalanced braces\n", "");
        issues[1].column = Some(4);

        let output = ConciseFormatter::new().format_issues(&issues, "lib/Foo.pm");
        assert_eq!(
            output,
            "lib/Foo.pm:3: Missing semicolon\nlib/Foo.pm:9:5: Unbalanced braces"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(ConciseFormatter::new().format_issues(&[], "a.pl"), "");
    }
}
