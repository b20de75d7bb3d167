#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
    Mixed,
}

pub fn detect_line_ending_enum(content: &str) -> LineEnding {
    let has_crlf = content.contains("\r\n");
    // LF characters that are NOT part of a CRLF pair
    let content_without_crlf = content.replace("\r\n", "");
    let has_standalone_lf = content_without_crlf.contains('\n');

    match (has_crlf, has_standalone_lf) {
        (true, true) => LineEnding::Mixed,
        (true, false) => LineEnding::Crlf,
        (false, true) => LineEnding::Lf,
        (false, false) => LineEnding::Lf, // No line endings, default to LF
    }
}

/// The separator a document uses, picking the more common one for mixed content.
pub fn detect_line_ending(content: &str) -> &'static str {
    match detect_line_ending_enum(content) {
        LineEnding::Lf => "\n",
        LineEnding::Crlf => "\r\n",
        LineEnding::Mixed => {
            let crlf_count = content.matches("\r\n").count();
            let lf_count = content.matches('\n').count() - crlf_count;
            if crlf_count > lf_count { "\r\n" } else { "\n" }
        }
    }
}

/// Return line `line_number` (1-based) of `content`, splitting on `eol`.
///
/// Mirrors how an editor addresses a document by its own line-ending convention,
/// so a stray `\r` left on a line of a mixed document stays part of that line.
pub fn nth_line<'a>(content: &'a str, line_number: usize, eol: &str) -> Option<&'a str> {
    if line_number == 0 {
        return None;
    }
    content.split(eol).nth(line_number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_ending_enum() {
        assert_eq!(detect_line_ending_enum("hello\nworld"), LineEnding::Lf);
        assert_eq!(detect_line_ending_enum("hello\r\nworld"), LineEnding::Crlf);
        assert_eq!(detect_line_ending_enum("hello\r\nworld\nmixed"), LineEnding::Mixed);
        assert_eq!(detect_line_ending_enum("no line endings"), LineEnding::Lf);
    }

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(detect_line_ending("hello\nworld"), "\n");
        assert_eq!(detect_line_ending("hello\r\nworld"), "\r\n");
        assert_eq!(detect_line_ending("hello\r\nworld\nmixed"), "\n"); // More LF than CRLF
        assert_eq!(detect_line_ending("a\r\nb\r\nc\n"), "\r\n");
        assert_eq!(detect_line_ending("no line endings"), "\n");
    }

    #[test]
    fn test_nth_line() {
        let text = "first\nsecond\nthird";
        assert_eq!(nth_line(text, 1, "\n"), Some("first"));
        assert_eq!(nth_line(text, 3, "\n"), Some("third"));
        assert_eq!(nth_line(text, 4, "\n"), None);
        assert_eq!(nth_line(text, 0, "\n"), None);

        let crlf = "one\r\ntwo\r\n";
        assert_eq!(nth_line(crlf, 2, "\r\n"), Some("two"));
    }
}
