//! Run perltidy and turn its error output into positioned diagnostics.
//!
//! The library is split along the path a formatting request takes:
//!
//! - [`tool`] launches perltidy with the source on stdin and collects its output.
//! - [`diagnostics`] parses perltidy's stderr into [`Issue`]s.
//! - [`session`] applies formatted text to a [`Document`] or reports the issues
//!   through a [`DiagnosticsSink`] and [`Notifier`].
//! - [`config`] holds the user settings every run takes a snapshot of.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod exit_codes;
pub mod output;
pub mod session;
pub mod sink;
pub mod tool;
pub mod utils;

pub use crate::config::{Config, ConfigStore};
pub use crate::diagnostics::{Issue, Severity, extract, extract_with_eol};
pub use crate::document::{Document, DocumentKey, TextBuffer};
pub use crate::session::{FormatError, FormatRequest, FormatResponse, FormatSession, TidyOutcome};
pub use crate::sink::{DiagnosticsSink, IssueCollection, Notifier};
pub use crate::tool::{FormatterRunner, ProcessOutcome, RunnerError, ToolArguments};
