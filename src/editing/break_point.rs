//! Choosing where to split a page when no caret is known

/// How far back from the target the search goes, in characters
pub const SEARCH_WINDOW: usize = 100;

/// Find a natural break near `target` (a char index), searching backward.
///
/// Preference order: just after a sentence end (`.`, `!` or `?` followed by
/// whitespace), then a paragraph break, then a space. Falls back to `target`
/// itself. The result is a char index, never past the end of `text`.
pub fn find_break_point(text: &str, target: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return 0;
    }

    let target = target.min(chars.len());
    let floor = target.saturating_sub(SEARCH_WINDOW);
    let at = |i: usize| chars.get(i).copied();
    let window = || (floor..=target).rev();

    if let Some(i) = window().find(|&i| {
        matches!(at(i), Some('.' | '!' | '?')) && matches!(at(i + 1), Some(' ' | '\n'))
    }) {
        return i + 1;
    }

    if let Some(i) = window().find(|&i| at(i) == Some('\n') && (i == 0 || at(i - 1) == Some('\n'))) {
        return i;
    }

    if let Some(i) = window().find(|&i| at(i) == Some(' ')) {
        return i;
    }

    target
}

/// Byte offset of char index `index`, clamped to the end of `text`
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_sentence_end() {
        let text = "One sentence here. Another one follows and goes on";
        // Target sits inside the second sentence
        assert_eq!(find_break_point(text, 30), 18);
    }

    #[test]
    fn test_paragraph_break() {
        let text = "no punctuation here\n\nsecond block continues";
        assert_eq!(find_break_point(text, 25), 20);
    }

    #[test]
    fn test_word_boundary() {
        let text = "alpha beta gamma delta";
        assert_eq!(find_break_point(text, 13), 10);
    }

    #[test]
    fn test_falls_back_to_target() {
        let text = "x".repeat(300);
        assert_eq!(find_break_point(&text, 150), 150);
        assert_eq!(find_break_point("", 10), 0);
    }

    #[test]
    fn test_outside_window_ignored() {
        let text = format!("Start. {}", "y".repeat(250));
        assert_eq!(find_break_point(&text, 200), 200);
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "héllo wörld";
        let point = find_break_point(text, 8);
        assert_eq!(point, 5);
        assert_eq!(&text[byte_offset(text, point)..], " wörld");
        assert_eq!(byte_offset(text, 99), text.len());
    }
}
