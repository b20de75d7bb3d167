//! Process exit statuses shared by every subcommand.
//!
//! CI scripts rely on telling "perltidy found something" apart from "tidybridge could
//! not do its job", so the two never share a code.

/// Every input was processed and nothing needs attention.
pub const SUCCESS: i32 = 0;

/// perltidy reported errors, or `--check`/`--diff` found files that would change.
pub const ISSUES_FOUND: i32 = 1;

/// Bad configuration, perltidy could not be run, or an input could not be read.
pub const TOOL_ERROR: i32 = 2;

/// The exit status for a finished run. Tool errors win over issues.
pub fn status_for(tool_errors: usize, issues: usize, would_reformat: usize) -> i32 {
    if tool_errors > 0 {
        TOOL_ERROR
    } else if issues > 0 || would_reformat > 0 {
        ISSUES_FOUND
    } else {
        SUCCESS
    }
}

pub mod exit {
    /// Terminate with [`TOOL_ERROR`](super::TOOL_ERROR) after the caller has printed why.
    pub fn tool_error() -> ! {
        std::process::exit(super::TOOL_ERROR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_precedence() {
        assert_eq!(status_for(0, 0, 0), SUCCESS);
        assert_eq!(status_for(0, 3, 0), ISSUES_FOUND);
        assert_eq!(status_for(0, 0, 1), ISSUES_FOUND);
        assert_eq!(status_for(1, 3, 1), TOOL_ERROR);
    }
}
