//! Text buffers that formatting results are applied to.

use crate::utils::detect_line_ending;
use std::fmt;
use std::ops::Range;
use std::path::Path;

/// File extensions treated as Perl.
pub const PERL_EXTENSIONS: &[&str] = &["pl", "pm", "t", "psgi", "cgi", "PL"];

/// Identifies a document to the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for DocumentKey {
    fn from(path: &Path) -> Self {
        Self(path.display().to_string())
    }
}

impl From<&str> for DocumentKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("range {start}..{end} is outside a buffer of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// A mutable text buffer addressed by byte ranges.
pub trait TextBuffer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn text_in_range(&self, range: Range<usize>) -> Result<&str, BufferError>;

    /// Replace `range` with `text` in one edit.
    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), BufferError>;

    /// The buffer's line ending, `"\n"` or `"\r\n"`.
    fn eol(&self) -> &'static str;
}

/// An in-memory document, optionally with a selected range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    key: DocumentKey,
    language_id: String,
    text: String,
    selection: Option<Range<usize>>,
}

impl Document {
    pub fn new(key: impl Into<DocumentKey>, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language_id: language_id.into(),
            text: text.into(),
            selection: None,
        }
    }

    /// A document for a file on disk, with the language guessed from its name and content.
    pub fn for_path(path: &Path, text: impl Into<String>) -> Self {
        let text = text.into();
        let language_id = language_for(path, &text);
        Self::new(path, language_id, text)
    }

    /// Select `range`. An empty range clears the selection.
    pub fn with_selection(mut self, range: Range<usize>) -> Result<Self, BufferError> {
        self.check_range(&range)?;
        self.selection = (!range.is_empty()).then_some(range);
        Ok(self)
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn is_perl(&self) -> bool {
        self.language_id.contains("perl")
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), BufferError> {
        let len = self.text.len();
        if range.start > range.end || range.end > len {
            return Err(BufferError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if !self.text.is_char_boundary(range.start) || !self.text.is_char_boundary(range.end) {
            return Err(BufferError::NotCharBoundary {
                start: range.start,
                end: range.end,
            });
        }
        Ok(())
    }
}

impl TextBuffer for Document {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn text_in_range(&self, range: Range<usize>) -> Result<&str, BufferError> {
        self.check_range(&range)?;
        Ok(&self.text[range])
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), BufferError> {
        self.check_range(&range)?;
        self.text.replace_range(range, text);
        // Offsets into the old text no longer mean anything
        self.selection = None;
        Ok(())
    }

    fn eol(&self) -> &'static str {
        detect_line_ending(&self.text)
    }
}

/// `"perl"` for Perl sources (by extension or `#!` line), `"plaintext"` otherwise.
pub fn language_for(path: &Path, text: &str) -> &'static str {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PERL_EXTENSIONS.contains(&ext));
    let by_shebang = text
        .lines()
        .next()
        .is_some_and(|first| first.starts_with("#!") && first.contains("perl"));

    if by_extension || by_shebang { "perl" } else { "plaintext" }
}
