//! Splitting perltidy's stderr into per-error blocks.

use regex::Regex;
use std::sync::LazyLock;

/// `<stdin>: 12:` (or `<stdin>:12:`) opens a new error report.
static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<stdin>*:\s?(\d+):").unwrap());

/// A contiguous run of stderr lines that belong to one reported error.
///
/// Borrows from the stderr text it was cut from; surrounding whitespace is trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBlock<'a> {
    text: &'a str,
}

impl<'a> ErrorBlock<'a> {
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.text.lines()
    }
}

/// Whether `line` carries the `<stdin>: N:` marker that opens a block.
pub fn is_block_start(line: &str) -> bool {
    BLOCK_START.is_match(line)
}

/// Cut `stderr` into blocks, one per marker line.
///
/// Text before the first marker becomes a leading block of its own. Blank blocks are
/// dropped and line order is preserved.
pub fn segment(stderr: &str) -> Vec<ErrorBlock<'_>> {
    let mut blocks = Vec::new();
    let mut block_start = 0;
    let mut pos = 0;

    for line in stderr.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if is_block_start(content) && pos > block_start {
            push_block(&mut blocks, &stderr[block_start..pos]);
            block_start = pos;
        }
        pos += line.len();
    }
    push_block(&mut blocks, &stderr[block_start..]);

    blocks
}

fn push_block<'a>(blocks: &mut Vec<ErrorBlock<'a>>, span: &'a str) {
    let text = span.trim();
    if !text.is_empty() {
        blocks.push(ErrorBlock { text });
    }
}
