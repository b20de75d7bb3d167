//! Running perltidy as an external process.
//!
//! [`ToolArguments`] turns the configured argument string into the argument vector
//! for one run, and [`FormatterRunner`] executes it with the source on stdin.

pub mod args;
pub mod runner;

pub use args::{DEFAULT_ARG, NO_TRAILING_NEWLINE_ARG, ToolArguments};
pub use runner::{FormatterRunner, ProcessOutcome, RunnerError};
