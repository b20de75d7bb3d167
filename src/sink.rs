//! Where formatting results are reported: per-document issues and one-line notices.

use crate::diagnostics::Issue;
use crate::document::DocumentKey;
use colored::*;
use std::collections::BTreeMap;

/// Receives the issues of each run. Exactly one method is called per outcome.
pub trait DiagnosticsSink {
    /// Replace every issue previously reported for `key`.
    fn set_issues(&mut self, key: &DocumentKey, issues: Vec<Issue>);

    fn clear_issues(&mut self, key: &DocumentKey);
}

/// One-line user notifications.
pub trait Notifier {
    /// Show `message`, replacing any notification still visible.
    fn notify(&mut self, message: &str);

    /// Withdraw the current notification, if any.
    fn cancel(&mut self);

    /// Report an error that stopped the run before perltidy produced anything.
    fn show_error(&mut self, message: &str);
}

/// Issues kept in memory, keyed by document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueCollection {
    issues: BTreeMap<DocumentKey, Vec<Issue>>,
}

impl IssueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issues(&self, key: &DocumentKey) -> &[Issue] {
        self.issues.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKey, &[Issue])> {
        self.issues.iter().map(|(key, issues)| (key, issues.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl DiagnosticsSink for IssueCollection {
    fn set_issues(&mut self, key: &DocumentKey, issues: Vec<Issue>) {
        if issues.is_empty() {
            self.issues.remove(key);
        } else {
            self.issues.insert(key.clone(), issues);
        }
    }

    fn clear_issues(&mut self, key: &DocumentKey) {
        self.issues.remove(key);
    }
}

/// Prints notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        if !self.quiet {
            eprintln!("{}: {message}", "perltidy".yellow().bold());
        }
    }

    // Lines already printed cannot be taken back
    fn cancel(&mut self) {}

    fn show_error(&mut self, message: &str) {
        eprintln!("{}: {message}", "Error".red().bold());
    }
}

/// A notification event, as recorded by [`NotificationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Notice(String),
    Cancelled,
    Error(String),
}

/// Records notifications instead of showing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationLog {
    events: Vec<Notification>,
}

impl NotificationLog {
    pub fn events(&self) -> &[Notification] {
        &self.events
    }

    /// The notification that would still be on screen.
    pub fn visible(&self) -> Option<&str> {
        match self.events.last()? {
            Notification::Notice(message) => Some(message),
            _ => None,
        }
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, message: &str) {
        self.events.push(Notification::Notice(message.to_string()));
    }

    fn cancel(&mut self) {
        self.events.push(Notification::Cancelled);
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(Notification::Error(message.to_string()));
    }
}
