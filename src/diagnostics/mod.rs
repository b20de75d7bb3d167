//! Structured diagnostics recovered from perltidy's stderr.
//!
//! perltidy has no machine-readable error format. With `-se` it writes reports such as
//!
//! ```text
//! <stdin>: 33: found ')' where operator expected
//! 33: ... cessful logins for $domain" } );
//! 33:                   -------^
//! ```
//!
//! [`extract`] cuts that text into blocks (see [`segment`]), parses each block into at
//! most one [`Issue`] (see [`parse_block`]) and keeps the ones that name a line.
//! Blocks that cannot be placed are dropped rather than guessed at.

pub mod block;
pub mod segment;

pub use block::{UNKNOWN_ERROR, locate_excerpt, parse_block};
pub use segment::{ErrorBlock, is_block_start, segment};

use crate::utils::detect_line_ending;
use serde::Serialize;

/// Value of [`Issue::source`] for everything this module produces.
pub const ISSUE_SOURCE: &str = "perltidy";

/// Severity of an issue. perltidy only reports errors on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    Error,
}

/// A positioned problem reported by perltidy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// 1-based line number as reported by perltidy.
    pub line: usize,
    /// Zero-based character column in the original (untruncated) source line.
    pub column: Option<usize>,
    /// End of the underlined range, same basis as `column`.
    pub end_column: Option<usize>,
    pub message: String,
    pub severity: Severity,
    pub source: String,
}

/// Parse perltidy's stderr into issues, in the order perltidy reported them.
///
/// `original_stdout` is the full source as perltidy echoed it; it is used to place
/// carets printed under truncated excerpts. Its lines are split on the line ending
/// detected in it; use [`extract_with_eol`] when the document's own convention is known.
pub fn extract(stderr: &str, original_stdout: &str) -> Vec<Issue> {
    extract_with_eol(stderr, original_stdout, detect_line_ending(original_stdout))
}

/// [`extract`], splitting `original_stdout` on the document's line ending `eol`.
pub fn extract_with_eol(stderr: &str, original_stdout: &str, eol: &str) -> Vec<Issue> {
    segment(stderr)
        .iter()
        .filter_map(|block| parse_block(block, original_stdout, eol))
        .collect()
}
