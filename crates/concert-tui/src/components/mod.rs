pub mod admin_panel;
pub mod cart_pane;
pub mod concert_list;
pub mod favorites_pane;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `max` display columns, appending an ellipsis when cut.
pub fn truncate_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate-or-pad to exactly `width` display columns.
pub fn pad_width(s: &str, width: usize) -> String {
    let t = truncate_width(s, width);
    let used = t.width();
    format!("{}{}", t, " ".repeat(width.saturating_sub(used)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("short", 10), "short");
        assert_eq!(truncate_width("a longer name", 8), "a longe…");
    }

    #[test]
    fn test_pad_width_is_exact() {
        assert_eq!(pad_width("ab", 4), "ab  ");
        assert_eq!(pad_width("abcdef", 4).width(), 4);
    }
}
