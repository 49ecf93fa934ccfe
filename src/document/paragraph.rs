//! Paragraph units and the paragraph splitter

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator placed between paragraphs inside a page
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A blank line, possibly holding stray whitespace
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

static HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:^(?:chapter|part|section) \d+)|^\d+\.|^[A-Z][^.!?]*[^.!?]$")
        .expect("valid regex")
});

/// An immutable unit of text as supplied by the document source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub content: String,
    pub is_heading: bool,
}

impl Paragraph {
    /// Create a paragraph, classifying it with the heading heuristic
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let is_heading = is_likely_heading(&content);
        Self { content, is_heading }
    }

    /// Create a body paragraph without running the heuristic
    pub fn body(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_heading: false,
        }
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Split raw text into trimmed, non-empty paragraph strings.
///
/// Blank lines separate paragraphs. Text that contains no blank line at all
/// is split on every single newline instead.
pub fn split_paragraph_texts(text: &str) -> Vec<&str> {
    if BLANK_LINE.is_match(text) {
        return split_blank_lines(text);
    }

    text.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split page content on blank lines only; a single newline stays inside
/// its paragraph.
pub fn split_blank_lines(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split raw text into classified paragraphs
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    split_paragraph_texts(text)
        .into_iter()
        .map(Paragraph::new)
        .collect()
}

/// Join paragraph texts with the paragraph separator
pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    let mut out = String::new();
    for (i, p) in paragraphs.iter().enumerate() {
        if i > 0 {
            out.push_str(PARAGRAPH_SEPARATOR);
        }
        out.push_str(p.as_ref());
    }
    out
}

/// Heuristic heading detection.
///
/// Short single-line text is a heading when it matches a chapter/part/section
/// or numbered pattern, starts with a capital and carries no sentence
/// punctuation, or when most of its (at most ten) words are capitalized.
pub fn is_likely_heading(text: &str) -> bool {
    if text.is_empty() || text.chars().count() > 200 || text.contains('\n') {
        return false;
    }

    if HEADING_PATTERN.is_match(text.trim()) {
        return true;
    }

    let words: Vec<&str> = text.split(' ').collect();
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().map_or(false, |c| !c.is_lowercase()))
        .count();

    words.len() <= 10 && capitalized as f32 / words.len() as f32 > 0.8
}
