//! Turning one error block into an [`Issue`].
//!
//! perltidy prints a source excerpt under each error and marks the offending token
//! with a caret (`^`) or a dash run ending in a caret (`-----^`). Long lines are
//! elided with `...`, so caret positions are relative to the shortened excerpt. The
//! parser finds where the excerpt sits inside the real line and corrects the caret
//! positions accordingly.

use super::segment::ErrorBlock;
use super::{ISSUE_SOURCE, Issue, Severity};
use crate::utils::{char_index, nth_line};
use regex::Regex;
use std::sync::LazyLock;

static LINE_NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+):").unwrap());
static DASH_CARET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-+\^$").unwrap());
static CARET_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s^]+$").unwrap());
static LEADING_ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\.\.\.\s").unwrap());
static TRAILING_ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\.\.\.$").unwrap());

const FILENAME_MARKER: &str = "<stdin>:";

/// Notices that never point at a fixable spot in the source.
const NOISE_NOTICES: [&str; 2] = ["To save a full .LOG", "Giving up after error"];

/// Message used when a block has a position but no readable text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Shape of a diagnostic line once its prefixes are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    /// `   ------^`: a column range from the first dash to the caret.
    DashCaret { start: usize, end: usize },
    /// `      ^`: a single column.
    Caret { position: usize },
    /// Message text or a source excerpt.
    Content(&'a str),
}

fn classify(text: &str) -> LineKind<'_> {
    let text = text.trim_end();
    if DASH_CARET.is_match(text)
        && let (Some(dash), Some(caret)) = (text.find('-'), text.find('^'))
    {
        return LineKind::DashCaret {
            start: char_index(text, dash),
            end: char_index(text, caret),
        };
    }
    if CARET_ONLY.is_match(text)
        && let Some(caret) = text.find('^')
    {
        return LineKind::Caret {
            position: char_index(text, caret),
        };
    }
    LineKind::Content(text.trim())
}

/// A raw line with the `<stdin>:` marker and `N:` line-number prefix removed.
struct StrippedLine<'a> {
    text: &'a str,
    line_number: Option<usize>,
    /// Character width of the `N:` prefix, when there was one.
    prefix_width: Option<usize>,
}

fn strip_prefixes(raw: &str) -> StrippedLine<'_> {
    let rest = raw.strip_prefix(FILENAME_MARKER).unwrap_or(raw);
    match LINE_NUMBER_PREFIX.captures(rest) {
        Some(caps) => {
            let prefix = &caps[0];
            StrippedLine {
                text: &rest[prefix.len()..],
                line_number: caps[1].parse().ok(),
                prefix_width: Some(prefix.chars().count()),
            }
        }
        None => StrippedLine {
            text: rest,
            line_number: None,
            prefix_width: None,
        },
    }
}

/// Whether a raw line is a caret underline for the excerpt above it.
fn is_annotation_line(raw: &str) -> bool {
    matches!(
        classify(strip_prefixes(raw).text),
        LineKind::DashCaret { .. } | LineKind::Caret { .. }
    )
}

/// Where the printed excerpt starts inside the original source line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Anchor {
    /// No elided excerpt seen yet; carets are taken as printed.
    #[default]
    LineStart,
    /// The excerpt starts at this character index of the original line.
    Located(usize),
    /// The excerpt could not be found, so carets cannot be placed.
    Lost,
}

/// Inputs to the caret correction, carried from line to line within one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Offsets {
    anchor: Anchor,
    line_number_offset: usize,
    ellipse_offset: usize,
}

impl Offsets {
    /// Shift applied to a caret position printed by perltidy.
    ///
    /// The excerpt start minus the stripped `N:` prefix width, and minus the `... `
    /// width as well when that is still positive.
    fn correction(&self) -> Option<isize> {
        let offset = match self.anchor {
            Anchor::LineStart => 0,
            Anchor::Located(index) => index as isize,
            Anchor::Lost => return None,
        };
        let adjusted = offset - self.line_number_offset as isize;
        if adjusted > 0 {
            Some(adjusted - self.ellipse_offset as isize)
        } else {
            Some(adjusted)
        }
    }

    fn column(&self, printed_position: usize) -> Option<usize> {
        let column = self.correction()? + printed_position as isize;
        usize::try_from(column).ok()
    }
}

/// Everything learned about a block so far.
#[derive(Debug, Default)]
struct BlockState {
    line_number: Option<usize>,
    offsets: Offsets,
    column: Option<usize>,
    end_column: Option<usize>,
    message: String,
}

impl BlockState {
    fn advance(mut self, raw: &str, next_raw: Option<&str>, original: &str, eol: &str) -> Self {
        // perltidy's own lines always carry a colon; anything else is interpreter chatter
        if !raw.contains(':') {
            return self;
        }

        let stripped = strip_prefixes(raw);
        if let Some(width) = stripped.prefix_width {
            self.offsets.line_number_offset = width;
        }
        if self.line_number.is_none() {
            self.line_number = stripped.line_number.filter(|&n| n > 0);
        }
        if stripped.text.trim().is_empty() {
            return self;
        }

        match classify(stripped.text) {
            LineKind::DashCaret { start, end } => {
                self.column = self.offsets.column(start);
                self.end_column = self.offsets.column(end);
            }
            LineKind::Caret { position } => {
                self.column = self.offsets.column(position);
            }
            LineKind::Content(text) => self.absorb_content(text, next_raw, original, eol),
        }
        self
    }

    fn absorb_content(&mut self, text: &str, next_raw: Option<&str>, original: &str, eol: &str) {
        let Some(line_number) = self.line_number else {
            return;
        };

        if let Some(ellipsis) = LEADING_ELLIPSIS.find(text) {
            self.offsets.ellipse_offset = ellipsis.as_str().chars().count();
            let excerpt = TRAILING_ELLIPSIS.replace(&text[ellipsis.end()..], "");
            self.offsets.anchor = match locate_excerpt(original, line_number, eol, &excerpt) {
                Some(index) => Anchor::Located(index),
                None => {
                    log::debug!("excerpt {excerpt:?} not found on line {line_number}; dropping columns");
                    Anchor::Lost
                }
            };
        }

        // An underline follows, so this line only repeats source the user can already see
        if next_raw.is_some_and(is_annotation_line) {
            return;
        }
        self.message.push_str(text);
    }

    fn into_issue(self) -> Option<Issue> {
        let line = self.line_number?;
        let message = if self.message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            self.message
        };
        Some(Issue {
            line,
            column: self.column,
            end_column: self.end_column,
            message,
            severity: Severity::Error,
            source: ISSUE_SOURCE.to_string(),
        })
    }
}

/// Character index at which `excerpt` starts within line `line_number` of `original`.
pub fn locate_excerpt(original: &str, line_number: usize, eol: &str, excerpt: &str) -> Option<usize> {
    if excerpt.is_empty() {
        return None;
    }
    let line = nth_line(original, line_number, eol)?;
    line.find(excerpt).map(|byte| char_index(line, byte))
}

/// Parse one block against the untruncated source perltidy echoed on stdout.
///
/// `eol` is the document's line ending, used to find the line an excerpt came from.
/// Returns `None` for notice-only blocks and for blocks that never name a line.
pub fn parse_block(block: &ErrorBlock<'_>, original: &str, eol: &str) -> Option<Issue> {
    let lines: Vec<&str> = block.lines().collect();

    if let Some(notice) = NOISE_NOTICES
        .iter()
        .find(|notice| lines.iter().any(|line| line.contains(*notice)))
    {
        log::debug!("skipping perltidy block with notice {notice:?}");
        return None;
    }

    let state = lines
        .iter()
        .enumerate()
        .fold(BlockState::default(), |state, (i, raw)| {
            state.advance(raw, lines.get(i + 1).copied(), original, eol)
        });

    let issue = state.into_issue();
    if issue.is_none() {
        log::debug!("dropping perltidy block without a line number: {:?}", block.as_str());
    }
    issue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::segment::segment;
    use crate::utils::detect_line_ending;
    use pretty_assertions::assert_eq;

    const LONG_LINE: &str = "foo(function ($bar) { return 1 + 2 }); # long trailing comment";

    fn parse_single(stderr: &str, original: &str) -> Option<Issue> {
        let blocks = segment(stderr);
        assert_eq!(blocks.len(), 1, "expected exactly one block in {stderr:?}");
        parse_block(&blocks[0], original, detect_line_ending(original))
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(classify("    -----^"), LineKind::DashCaret { start: 4, end: 9 });
        assert_eq!(classify("      ^"), LineKind::Caret { position: 6 });
        assert_eq!(classify("   ^   "), LineKind::Caret { position: 3 });
        assert_eq!(classify("  Missing ')'  "), LineKind::Content("Missing ')'"));
        assert_eq!(classify("$a ^ $b"), LineKind::Content("$a ^ $b"));
    }

    #[test]
    fn test_strip_prefixes() {
        let stripped = strip_prefixes("<stdin>: 12: found bareword");
        assert_eq!(stripped.text, " found bareword");
        assert_eq!(stripped.line_number, Some(12));
        assert_eq!(stripped.prefix_width, Some(4));

        let bare = strip_prefixes("hint: look here");
        assert_eq!(bare.text, "hint: look here");
        assert_eq!(bare.line_number, None);
        assert_eq!(bare.prefix_width, None);
    }

    #[test]
    fn test_locate_excerpt_in_untruncated_line() {
        let original = format!("use strict;\n{LONG_LINE}\n");
        let excerpt = "... { return 1 + 2 }); # long";
        let residue = LEADING_ELLIPSIS.replace(excerpt, "");
        let index = locate_excerpt(&original, 2, "\n", &residue);
        assert_eq!(index, LONG_LINE.find("{ return 1 + 2 }); # long"));
        assert_eq!(index, Some(20));
    }

    #[test]
    fn test_locate_excerpt_missing() {
        assert_eq!(locate_excerpt("abc\n", 1, "\n", "xyz"), None);
        assert_eq!(locate_excerpt("abc\n", 5, "\n", "abc"), None);
        assert_eq!(locate_excerpt("abc\n", 1, "\n", ""), None);
    }

    #[test]
    fn test_plain_message() {
        let issue = parse_single("<stdin>:3: (-se) Missing semicolon\n", "a;\nb;\nc\n").unwrap();
        assert_eq!(issue.line, 3);
        assert_eq!(issue.message, "(-se) Missing semicolon");
        assert_eq!(issue.column, None);
        assert_eq!(issue.end_column, None);
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.source, ISSUE_SOURCE);
    }

    #[test]
    fn test_truncated_excerpt_with_dash_caret() {
        let original = format!("{LONG_LINE}\n");
        let stderr = "<stdin>: 1: found ')' where operator expected\n\
                      1: ... { return 1 + 2 }); # long ...\n\
                      1:         -------^\n";
        let issue = parse_single(stderr, &original).unwrap();

        // excerpt at 20, minus the "1:" prefix (2), minus the "... " marker (4)
        assert_eq!(issue.column, Some(14 + 9));
        assert_eq!(issue.end_column, Some(14 + 16));
        assert_eq!(issue.message, "found ')' where operator expected");
    }

    #[test]
    fn test_caret_without_truncation() {
        let stderr = format!(
            "<stdin>: 2: syntax error near ';'\n2: my $x = (1 + ;\n2:{}^\n",
            " ".repeat(15)
        );
        let issue = parse_single(&stderr, "use strict;\nmy $x = (1 + ;\n").unwrap();
        assert_eq!(issue.line, 2);
        assert_eq!(issue.column, Some(13));
        assert_eq!(issue.end_column, None);
        assert_eq!(issue.message, "syntax error near ';'");
    }

    #[test]
    fn test_lost_excerpt_drops_columns() {
        let stderr = "<stdin>: 1: bad token\n1: ... not in the source ...\n1:     ---^\n";
        let issue = parse_single(stderr, "print 1;\n").unwrap();
        assert_eq!(issue.column, None);
        assert_eq!(issue.end_column, None);
        assert_eq!(issue.message, "bad token");
    }

    #[test]
    fn test_excerpt_lookup_uses_document_line_endings() {
        let original = format!("use strict;\r\n{LONG_LINE}\r\n");
        let stderr = "<stdin>: 2: oops\n2: ... { return 1 + 2 }); # long ...\n2:   ^\n";
        let issue = parse_single(stderr, &original).unwrap();
        assert_eq!(issue.column, Some(20 - 2 - 4 + 3));
    }

    #[test]
    fn test_mixed_endings_follow_the_given_eol() {
        // Two CRLF breaks and one bare LF: detection picks CRLF, which merges lines 2 and 3
        let original = format!("use strict;\r\nmy $x;\n{LONG_LINE}\r\n");
        let stderr = "<stdin>: 3: oops\n3: ... { return 1 + 2 }); # long ...\n3:   ^\n";
        let blocks = segment(stderr);

        let detected = parse_block(&blocks[0], &original, detect_line_ending(&original)).unwrap();
        assert_eq!(detected.column, None);

        let by_document = parse_block(&blocks[0], &original, "\n").unwrap();
        assert_eq!(by_document.column, Some(20 - 2 - 4 + 3));
    }

    #[test]
    fn test_annotation_only_block_is_unknown_error() {
        let issue = parse_single("<stdin>: 4:     ^\n", "x\n").unwrap();
        assert_eq!(issue.line, 4);
        assert_eq!(issue.message, UNKNOWN_ERROR);
    }

    #[test]
    fn test_notices_reject_block() {
        assert_eq!(
            parse_single("<stdin>: 5: To save a full .LOG file rerun with -g\n", ""),
            None
        );
        assert_eq!(
            parse_single("<stdin>: 5: something odd\nGiving up after error\n", ""),
            None
        );
    }

    #[test]
    fn test_lines_without_colon_are_ignored() {
        let stderr = "<stdin>: 4: Missing semicolon\nUseless use of a constant in void context\n";
        let issue = parse_single(stderr, "").unwrap();
        assert_eq!(issue.message, "Missing semicolon");
    }

    #[test]
    fn test_continuation_lines_concatenate() {
        let stderr = "<stdin>: 7: Missing ')'\n  hint: check the call\n";
        let issue = parse_single(stderr, "").unwrap();
        assert_eq!(issue.message, "Missing ')'hint: check the call");
    }

    #[test]
    fn test_first_line_number_wins() {
        let stderr = "<stdin>: 7: first\n9: second\n";
        let issue = parse_single(stderr, "").unwrap();
        assert_eq!(issue.line, 7);
        assert_eq!(issue.message, "firstsecond");
    }

    #[test]
    fn test_block_without_line_number() {
        assert_eq!(parse_single("perltidy: warning: odd input\n", ""), None);
        assert_eq!(parse_single("<stdin>: 0: zero is not a line\n", ""), None);
    }

    #[test]
    fn test_offsets_correction() {
        let start = Offsets::default();
        assert_eq!(start.correction(), Some(0));

        let prefixed = Offsets {
            line_number_offset: 3,
            ..Offsets::default()
        };
        assert_eq!(prefixed.correction(), Some(-3));
        assert_eq!(prefixed.column(2), None);
        assert_eq!(prefixed.column(5), Some(2));

        let located = Offsets {
            anchor: Anchor::Located(20),
            line_number_offset: 3,
            ellipse_offset: 4,
        };
        assert_eq!(located.correction(), Some(13));

        let lost = Offsets {
            anchor: Anchor::Lost,
            ..Offsets::default()
        };
        assert_eq!(lost.column(10), None);
    }
}
