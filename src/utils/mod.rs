//! Shared text helpers.

pub mod line_ending;

pub use line_ending::{LineEnding, detect_line_ending, detect_line_ending_enum, nth_line};

/// Convert a byte offset inside `text` into a character index.
///
/// Columns are reported in characters so multi-byte Perl source (string literals,
/// POD) still lines up with what an editor shows.
pub fn char_index(text: &str, byte_offset: usize) -> usize {
    text.get(..byte_offset).map_or(0, |prefix| prefix.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_index_ascii_and_multibyte() {
        assert_eq!(char_index("abc", 2), 2);
        assert_eq!(char_index("é=1", 2), 1);
        assert_eq!(char_index("abc", 0), 0);
    }
}
