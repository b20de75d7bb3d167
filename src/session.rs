//! Formatting a document end to end.
//!
//! A [`FormatSession`] ties the pieces together: it takes a configuration snapshot,
//! runs perltidy, and then either applies the formatted text to the buffer and clears
//! the document's issues, or turns perltidy's stderr into issues for the sink.

use crate::config::{Config, ConfigStore};
use crate::diagnostics::{Issue, extract, extract_with_eol};
use crate::document::{BufferError, Document, TextBuffer};
use crate::sink::{DiagnosticsSink, Notifier};
use crate::tool::{FormatterRunner, ProcessOutcome, RunnerError, ToolArguments};
use serde::Serialize;
use std::ops::Range;
use tokio_util::sync::CancellationToken;

/// Shown after a run that produced issues.
pub const FAILURE_NOTICE: &str = "Error while formatting, check issues pane";

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Configure perltidy before running")]
    NotConfigured,

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// One formatting job: the text to send and where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub source_text: String,
    pub is_selection: bool,
    pub target_range: Range<usize>,
}

impl FormatRequest {
    /// The selection if there is one, otherwise the whole document.
    pub fn for_document(document: &Document) -> Result<Self, BufferError> {
        let (target_range, is_selection) = match document.selection() {
            Some(selection) => (selection, true),
            None => (0..document.len(), false),
        };
        Ok(Self {
            source_text: document.text_in_range(target_range.clone())?.to_string(),
            is_selection,
            target_range,
        })
    }
}

/// Result of [`FormatSession::format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FormatResponse {
    Ok { text: String },
    Error { issues: Vec<Issue> },
}

/// What [`FormatSession::tidy`] did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidyOutcome {
    /// The formatted text was applied; `changed` is false when perltidy returned the input.
    Formatted { changed: bool },
    /// perltidy failed and this many issues were reported.
    Failed { issue_count: usize },
}

/// Build a runner from one configuration snapshot.
pub fn runner_for(config: &Config) -> Result<FormatterRunner, FormatError> {
    let executable = config.executable().ok_or(FormatError::NotConfigured)?;
    let arguments = ToolArguments::from_config(config.args.as_deref());
    Ok(FormatterRunner::new(executable, arguments).with_timeout(config.timeout))
}

pub struct FormatSession<S, N> {
    store: ConfigStore,
    sink: S,
    notifier: N,
}

impl<S: DiagnosticsSink, N: Notifier> FormatSession<S, N> {
    pub fn new(store: ConfigStore, sink: S, notifier: N) -> Self {
        Self { store, sink, notifier }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (S, N) {
        (self.sink, self.notifier)
    }

    /// Run perltidy on `source` without touching any document.
    pub async fn format(&self, source: &str, is_selection: bool) -> Result<FormatResponse, FormatError> {
        self.format_cancellable(source, is_selection, &CancellationToken::new())
            .await
    }

    pub async fn format_cancellable(
        &self,
        source: &str,
        is_selection: bool,
        cancel: &CancellationToken,
    ) -> Result<FormatResponse, FormatError> {
        self.run_formatter(source, is_selection, None, cancel).await
    }

    /// Run perltidy once. `eol` is the document's line ending when there is a document;
    /// without one it is detected from the output.
    async fn run_formatter(
        &self,
        source: &str,
        is_selection: bool,
        eol: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<FormatResponse, FormatError> {
        let config = self.store.snapshot();
        let runner = runner_for(&config)?;

        match runner.run_cancellable(source, is_selection, cancel).await? {
            ProcessOutcome::Success { formatted_text } => Ok(FormatResponse::Ok { text: formatted_text }),
            ProcessOutcome::Failure {
                stderr_text,
                stdout_text,
            } => {
                // Without an echo on stdout, the input is the best copy of the full source
                let original = if stdout_text.is_empty() {
                    source
                } else {
                    stdout_text.as_str()
                };
                let issues = match eol {
                    Some(eol) => extract_with_eol(&stderr_text, original, eol),
                    None => extract(&stderr_text, original),
                };
                log::debug!("perltidy failed with {} issue(s)", issues.len());
                Ok(FormatResponse::Error { issues })
            }
        }
    }

    /// Format the document's selection, or the whole document, and report the result.
    pub async fn tidy(&mut self, document: &mut Document) -> Result<TidyOutcome, FormatError> {
        self.tidy_cancellable(document, &CancellationToken::new()).await
    }

    pub async fn tidy_cancellable(
        &mut self,
        document: &mut Document,
        cancel: &CancellationToken,
    ) -> Result<TidyOutcome, FormatError> {
        let result = match FormatRequest::for_document(document) {
            Ok(request) => self.apply(document, request, cancel).await,
            Err(e) => Err(e.into()),
        };
        self.report_error(result)
    }

    /// Format the whole document before it is saved, if configured to and it is Perl.
    pub async fn on_will_save(&mut self, document: &mut Document) -> Result<Option<TidyOutcome>, FormatError> {
        if !document.is_perl() || !self.store.snapshot().format_on_save {
            return Ok(None);
        }
        let request = FormatRequest {
            source_text: document.text().to_string(),
            is_selection: false,
            target_range: 0..document.len(),
        };
        let result = self.apply(document, request, &CancellationToken::new()).await;
        self.report_error(result).map(Some)
    }

    /// Errors that stop a run before perltidy produced anything are shown to the user.
    fn report_error<T>(&mut self, result: Result<T, FormatError>) -> Result<T, FormatError> {
        if let Err(e) = &result {
            self.notifier.show_error(&e.to_string());
        }
        result
    }

    async fn apply(
        &mut self,
        document: &mut Document,
        request: FormatRequest,
        cancel: &CancellationToken,
    ) -> Result<TidyOutcome, FormatError> {
        let eol = document.eol();
        let response = self
            .run_formatter(&request.source_text, request.is_selection, Some(eol), cancel)
            .await?;

        match response {
            FormatResponse::Ok { text } => {
                let changed = text != request.source_text;
                document.replace_range(request.target_range, &text)?;
                self.sink.clear_issues(document.key());
                self.notifier.cancel();
                Ok(TidyOutcome::Formatted { changed })
            }
            FormatResponse::Error { mut issues } => {
                if request.is_selection {
                    shift_into_document(&mut issues, document.text(), request.target_range.start);
                }
                let issue_count = issues.len();
                self.sink.set_issues(document.key(), issues);
                self.notifier.notify(FAILURE_NOTICE);
                Ok(TidyOutcome::Failed { issue_count })
            }
        }
    }
}

/// Move issues perltidy reported against a selection starting at byte `start` to
/// document positions. Columns only move on the selection's first line.
fn shift_into_document(issues: &mut [Issue], text: &str, start: usize) {
    let before = text.get(..start).unwrap_or_default();
    let line_offset = before.matches('\n').count();
    let column_offset = before.rsplit('\n').next().map_or(0, |partial| partial.chars().count());

    for issue in issues {
        if issue.line == 1 {
            issue.column = issue.column.map(|column| column + column_offset);
            issue.end_column = issue.end_column.map(|column| column + column_offset);
        }
        issue.line += line_offset;
    }
}
