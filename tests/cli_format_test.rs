#![cfg(unix)]

mod common;

use common::{ARGS_ECHO, FAILING, IDENTITY, Project, SHOUTING};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_format_rewrites_file_in_place() {
    let project = Project::new(SHOUTING);
    project.write("a.pl", "print 1;\n");

    project
        .cmd()
        .args(["format", "a.pl"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Reformatted: a.pl"));

    assert_eq!(project.read("a.pl"), "PRINT 1;\n");
}

#[test]
fn test_format_walks_directories_for_perl_files() {
    let project = Project::new(SHOUTING);
    project.write("lib/Foo.pm", "package foo;\n");
    project.write("t/basic.t", "ok 1;\n");
    project.write("notes.txt", "leave me\n");

    project.cmd().args(["format", "."]).assert().success();

    assert_eq!(project.read("lib/Foo.pm"), "PACKAGE FOO;\n");
    assert_eq!(project.read("t/basic.t"), "OK 1;\n");
    assert_eq!(project.read("notes.txt"), "leave me\n");
}

#[test]
fn test_format_stdin_to_stdout() {
    let project = Project::new(SHOUTING);

    project
        .cmd()
        .args(["format", "-"])
        .write_stdin("my $x = 1;\n")
        .assert()
        .success()
        .stdout("MY $X = 1;\n");
}

#[test]
fn test_unchanged_stdin_is_still_echoed() {
    let project = Project::new(IDENTITY);

    project
        .cmd()
        .args(["format", "-"])
        .write_stdin("my $x = 1;\n")
        .assert()
        .success()
        .stdout("my $x = 1;\n");
}

#[test]
fn test_check_flag_reports_without_writing() {
    let project = Project::new(SHOUTING);
    project.write("a.pl", "print 1;\n");

    project
        .cmd()
        .args(["format", "--check", "a.pl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Would reformat: a.pl"));

    assert_eq!(project.read("a.pl"), "print 1;\n");
}

#[test]
fn test_check_flag_passes_when_already_tidy() {
    let project = Project::new(IDENTITY);
    project.write("a.pl", "print 1;\n");

    project.cmd().args(["format", "--check", "a.pl"]).assert().success();
}

#[test]
fn test_diff_flag_prints_changes() {
    let project = Project::new(SHOUTING);
    project.write("a.pl", "print 1;\n");

    project
        .cmd()
        .args(["format", "--diff", "a.pl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--- a.pl"))
        .stdout(predicate::str::contains("-print 1;"))
        .stdout(predicate::str::contains("+PRINT 1;"));

    assert_eq!(project.read("a.pl"), "print 1;\n");
}

#[test]
fn test_failure_prints_issues_and_keeps_file() {
    let project = Project::new(FAILING);
    project.write("a.pl", "use strict;\nmy $x = ;\n");

    project
        .cmd()
        .args(["format", "a.pl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.pl:2: [perltidy] syntax error near ;"))
        .stdout(predicate::str::contains(".LOG").not())
        .stderr(predicate::str::contains("Error while formatting, check issues pane"))
        .stderr(predicate::str::contains("Found 1 issue in 1 file"));

    assert_eq!(project.read("a.pl"), "use strict;\nmy $x = ;\n");
}

#[test]
fn test_failure_concise_output() {
    let project = Project::new(FAILING);
    project.write("a.pl", "use strict;\nmy $x = ;\n");

    project
        .cmd()
        .args(["format", "--output-format", "concise", "a.pl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.pl:2: syntax error near ;"));
}

#[test]
fn test_failure_github_output() {
    let project = Project::new(FAILING);
    project.write("a.pl", "use strict;\nmy $x = ;\n");

    project
        .cmd()
        .args(["format", "-o", "github", "a.pl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("::error file=a.pl,line=2"));
}

#[test]
fn test_failure_json_output() {
    let project = Project::new(FAILING);
    project.write("a.pl", "use strict;\nmy $x = ;\n");

    let output = project
        .cmd()
        .args(["format", "--output-format", "json", "a.pl"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let issues = parsed.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["file"], "a.pl");
    assert_eq!(issues[0]["line"], 2);
    assert_eq!(issues[0]["message"], "syntax error near ;");
    assert_eq!(issues[0]["severity"], "error");
    assert_eq!(issues[0]["source"], "perltidy");
}

#[test]
fn test_not_configured_is_a_tool_error() {
    let project = Project::new(IDENTITY);
    project.write("a.pl", "print 1;\n");

    project
        .bare_cmd()
        .args(["format", "a.pl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configure perltidy before running"));
}

#[test]
fn test_missing_executable_is_a_tool_error() {
    let project = Project::new(IDENTITY);
    project.write("a.pl", "print 1;\n");

    project
        .bare_cmd()
        .args(["--perltidy", "/nonexistent/perltidy", "format", "a.pl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/perltidy"));

    assert_eq!(project.read("a.pl"), "print 1;\n");
}

#[test]
fn test_missing_path_is_reported() {
    let project = Project::new(IDENTITY);

    project
        .cmd()
        .args(["format", "nope.pl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Path not found: nope.pl"));
}

#[test]
fn test_selection_formats_only_the_range() {
    let project = Project::new(SHOUTING);
    project.write("a.pl", "my $a;\nmy $b;\n");

    project
        .cmd()
        .args(["format", "--selection", "7..13", "a.pl"])
        .assert()
        .success();

    assert_eq!(project.read("a.pl"), "my $a;\nMY $B;\n");
}

#[test]
fn test_selection_adds_no_trailing_newline_flag_once() {
    let project = Project::new(ARGS_ECHO);

    let output = project
        .bare_cmd()
        .args(["--perltidy", "/bin/sh", "--args", &project.perltidy_args("-se -natnl")])
        .args(["format", "--selection", "0..4", "-"])
        .write_stdin("abcdef")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("-natnl").count(), 1);
    assert!(stdout.contains("-se"));
}

#[test]
fn test_selection_rejects_bad_range() {
    let project = Project::new(IDENTITY);
    project.write("a.pl", "print 1;\n");

    project
        .cmd()
        .args(["format", "--selection", "5..2", "a.pl"])
        .assert()
        .failure();
}

#[test]
fn test_failing_selection_reports_file_lines() {
    let project = Project::new(
        "cat > /dev/null\n\
         echo '<stdin>: 1: syntax error in selection' >&2\n\
         exit 1\n",
    );
    project.write("a.pl", "use strict;\nmy $x = ;\n");

    project
        .cmd()
        .args(["format", "--selection", "12..21", "-o", "concise", "a.pl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.pl:2: syntax error in selection"));

    assert_eq!(project.read("a.pl"), "use strict;\nmy $x = ;\n");
}
