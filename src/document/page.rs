//! Pages, image placeholders and fill state

use serde::{Deserialize, Serialize};

use crate::document::paragraph::{join_paragraphs, split_blank_lines, PARAGRAPH_SEPARATOR};
use crate::settings::{FillThresholds, FlowTuning};

/// Size class of an image placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    Half,
    Full,
}

impl ImageKind {
    /// Parse "half" / "full"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "half" => Some(ImageKind::Half),
            "full" => Some(ImageKind::Full),
            _ => None,
        }
    }

    /// Height this placeholder takes away from the text area
    pub fn height_budget(&self, tuning: &FlowTuning) -> f32 {
        match self {
            ImageKind::Half => tuning.half_image_height_px,
            ImageKind::Full => tuning.full_image_height_px,
        }
    }
}

/// An image placeholder reserving space on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlaceholder {
    pub kind: ImageKind,
    pub id: String,
}

/// Total height reserved by a set of placeholders
pub fn image_budget(images: &[ImagePlaceholder], tuning: &FlowTuning) -> f32 {
    images.iter().map(|img| img.kind.height_budget(tuning)).sum()
}

/// A single page of the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    number: usize,
    content: String,
    character_count: usize,
    images: Vec<ImagePlaceholder>,
    has_heading: bool,
}

impl Page {
    /// Create an empty page
    pub fn blank(number: usize) -> Self {
        Self {
            number,
            content: String::new(),
            character_count: 0,
            images: Vec::new(),
            has_heading: false,
        }
    }

    /// Create a page holding the given content
    pub fn with_content(number: usize, content: impl Into<String>) -> Self {
        let mut page = Self::blank(number);
        page.set_content(content);
        page
    }

    /// 1-based page number
    pub fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content, keeping the character count in sync
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.character_count = self.content.chars().count();
    }

    /// Length of the content in characters
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    /// Whether the page holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn images(&self) -> &[ImagePlaceholder] {
        &self.images
    }

    pub(crate) fn images_mut(&mut self) -> &mut Vec<ImagePlaceholder> {
        &mut self.images
    }

    /// Whether initial layout placed a heading on this page
    pub fn has_heading(&self) -> bool {
        self.has_heading
    }

    pub(crate) fn set_has_heading(&mut self, has_heading: bool) {
        self.has_heading = has_heading;
    }

    /// Paragraph texts on this page, separated by blank lines
    pub fn paragraphs(&self) -> Vec<&str> {
        split_blank_lines(&self.content)
    }

    /// Put content in front of the existing content
    pub fn prepend(&mut self, content: &str) {
        if self.is_blank() {
            self.set_content(content);
        } else {
            let merged = format!("{}{}{}", content, PARAGRAPH_SEPARATOR, self.content);
            self.set_content(merged);
        }
    }

    /// Append content after the existing content
    pub fn append(&mut self, content: &str) {
        if self.is_blank() {
            self.set_content(content);
        } else {
            let merged = format!("{}{}{}", self.content, PARAGRAPH_SEPARATOR, content);
            self.set_content(merged);
        }
    }

    /// Replace the content with the given paragraphs
    pub fn set_paragraphs<S: AsRef<str>>(&mut self, paragraphs: &[S]) {
        self.set_content(join_paragraphs(paragraphs));
    }

    /// Whether this page holds a single short line
    pub fn is_orphan(&self) -> bool {
        let text = self.content.trim();
        if text.is_empty() {
            return false;
        }
        let lines = text.lines().filter(|l| !l.trim().is_empty()).count();
        lines == 1 && text.chars().count() < 50
    }
}

/// How full a page is relative to its available height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillState {
    Optimal,
    NearFull,
    Full,
    Overflow,
}

impl FillState {
    /// Bucket a fill ratio
    pub fn from_ratio(ratio: f32, thresholds: &FillThresholds) -> Self {
        if ratio <= thresholds.optimal {
            FillState::Optimal
        } else if ratio <= thresholds.near_full {
            FillState::NearFull
        } else if ratio <= thresholds.full {
            FillState::Full
        } else {
            FillState::Overflow
        }
    }

    /// Page status line shown next to the page
    pub fn status_text(&self) -> &'static str {
        match self {
            FillState::Overflow => "Flowing...",
            _ => "Ready",
        }
    }
}

/// Measured fill of a page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFill {
    pub used_height: f32,
    pub available_height: f32,
    pub ratio: f32,
    pub state: FillState,
}

impl PageFill {
    /// Short indicator: a percentage, "FULL" or "OVERFLOW"
    pub fn indicator(&self) -> String {
        match self.state {
            FillState::Optimal | FillState::NearFull => {
                format!("{}%", (self.ratio * 100.0).round() as i64)
            }
            FillState::Full => "FULL".to_string(),
            FillState::Overflow => "OVERFLOW".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_count_tracks_content() {
        let mut page = Page::with_content(1, "héllo");
        assert_eq!(page.character_count(), 5);
        page.append("world");
        assert_eq!(page.content(), "héllo\n\nworld");
        assert_eq!(page.character_count(), 12);
        page.set_content("");
        assert_eq!(page.character_count(), 0);
        assert!(page.is_blank());
    }

    #[test]
    fn test_prepend_into_blank() {
        let mut page = Page::blank(2);
        page.prepend("first");
        assert_eq!(page.content(), "first");
        page.prepend("zero");
        assert_eq!(page.content(), "zero\n\nfirst");
    }

    #[test]
    fn test_image_budget() {
        let tuning = FlowTuning::default();
        let images = vec![
            ImagePlaceholder { kind: ImageKind::Half, id: "a".into() },
            ImagePlaceholder { kind: ImageKind::Full, id: "b".into() },
        ];
        assert_eq!(image_budget(&images, &tuning), 530.0);
        assert_eq!(ImageKind::from_name("FULL"), Some(ImageKind::Full));
        assert_eq!(ImageKind::from_name("quarter"), None);
    }

    #[test]
    fn test_fill_state_buckets() {
        let t = FillThresholds::default();
        assert_eq!(FillState::from_ratio(0.5, &t), FillState::Optimal);
        assert_eq!(FillState::from_ratio(0.7, &t), FillState::Optimal);
        assert_eq!(FillState::from_ratio(0.85, &t), FillState::NearFull);
        assert_eq!(FillState::from_ratio(1.0, &t), FillState::Full);
        assert_eq!(FillState::from_ratio(1.01, &t), FillState::Overflow);
        assert_eq!(FillState::Overflow.status_text(), "Flowing...");
    }

    #[test]
    fn test_orphan_detection() {
        assert!(Page::with_content(1, "The end.").is_orphan());
        assert!(!Page::with_content(1, "").is_orphan());
        assert!(!Page::with_content(1, "one\ntwo").is_orphan());
        assert!(!Page::with_content(1, "x".repeat(60)).is_orphan());
    }
}
