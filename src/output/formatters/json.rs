//! JSON output formatter

use crate::diagnostics::Issue;
use crate::output::OutputFormatter;
use serde_json::{Value, json};

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

fn issue_to_json(file_path: &str, issue: &Issue) -> Value {
    json!({
        "file": file_path,
        "line": issue.line,
        "column": issue.column,
        "end_column": issue.end_column,
        "message": issue.message,
        "severity": issue.severity,
        "source": issue.source,
    })
}

impl OutputFormatter for JsonFormatter {
    fn format_issues(&self, issues: &[Issue], file_path: &str) -> String {
        let json_issues: Vec<Value> = issues.iter().map(|issue| issue_to_json(file_path, issue)).collect();
        serde_json::to_string_pretty(&json_issues).unwrap_or_default()
    }
}

/// Format the issues of several files as a single JSON array
pub fn format_all_issues_as_json(all_issues: &[(String, Vec<Issue>)]) -> String {
    let json_issues: Vec<Value> = all_issues
        .iter()
        .flat_map(|(file_path, issues)| issues.iter().map(move |issue| issue_to_json(file_path, issue)))
        .collect();
    serde_json::to_string_pretty(&json_issues).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::extract;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_is_empty_array() {
        assert_eq!(JsonFormatter::new().format_issues(&[], "a.pl"), "[]");
        assert_eq!(format_all_issues_as_json(&[]), "[]");
    }

    #[test]
    fn test_issue_fields() {
        let issues = extract("<stdin>: 3: (-se) Missing semicolon\n", "");
        let output = JsonFormatter::new().format_issues(&issues, "script.pl");
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            parsed,
            json!([{
                "file": "script.pl",
                "line": 3,
                "column": null,
                "end_column": null,
                "message": "(-se) Missing semicolon",
                "severity": "error",
                "source": "perltidy",
            }])
        );
    }

    #[test]
    fn test_all_files_in_order() {
        let all = vec![
            ("a.pl".to_string(), extract("<stdin>: 1: x\n", "")),
            ("b.pl".to_string(), extract("<stdin>: 2: y\n<stdin>: 3: z\n", "")),
        ];
        let parsed: Value = serde_json::from_str(&format_all_issues_as_json(&all)).unwrap();
        let files: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["file"].as_str().unwrap())
            .collect();
        assert_eq!(files, vec!["a.pl", "b.pl", "b.pl"]);
    }
}
