//! Command handlers for the tidybridge CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to.

pub mod check;
pub mod format;
pub mod init;
pub mod schema;
pub mod version;
