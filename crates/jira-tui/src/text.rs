//! Small text helpers shared by the panes.

use ratatui::text::Span;

/// Left-pads `text` with `n` spaces.
pub fn pad(text: &str, n: usize) -> String {
    format!("{}{text}", " ".repeat(n))
}

/// Splits text into display lines. Tabs are expanded and trailing carriage
/// returns from CRLF input are dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r').replace('\t', "    "))
        .collect()
}

/// Terminal display width of `text`.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Truncates `text` to at most `max_width` display columns, marking the cut
/// with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = display_width(ch.encode_utf8(&mut [0; 4]));
        if width + w > max_width - 1 {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad("abc", 1), " abc");
        assert_eq!(pad("", 2), "  ");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\tc"), vec!["a", "b    c"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        let out = truncate("hello world", 6);
        assert_eq!(out, "hello…");
        assert_eq!(display_width(&out), 6);
    }

    #[test]
    fn test_truncate_wide_chars() {
        let out = truncate("文件夹数据", 5);
        assert!(display_width(&out) <= 5);
        assert!(out.ends_with('…'));
    }
}
