//! Page settings: book size, margins, typography and flow tuning
//!
//! Settings serialize to camelCase JSON so a UI can export and re-import them.
//! Every field has a default, so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Physical trim size of the book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BookSize {
    /// 5.5" x 8.5" trade paperback
    Standard,
    /// 8" x 8" square picture book
    Illustration,
    /// Arbitrary size in inches
    #[serde(rename_all = "camelCase")]
    Custom { width_in: f32, height_in: f32 },
}

impl Default for BookSize {
    fn default() -> Self {
        BookSize::Standard
    }
}

impl BookSize {
    /// Width and height in inches
    pub fn dimensions_in(&self) -> (f32, f32) {
        match *self {
            BookSize::Standard => (5.5, 8.5),
            BookSize::Illustration => (8.0, 8.0),
            BookSize::Custom { width_in, height_in } => (width_in, height_in),
        }
    }
}

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub inside: f32,
    pub outside: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 0.75,
            bottom: 0.75,
            inside: 0.5,
            outside: 0.5,
        }
    }
}

impl Margins {
    /// Same margin on all four sides
    pub fn uniform(inches: f32) -> Self {
        Self {
            top: inches,
            bottom: inches,
            inside: inches,
            outside: inches,
        }
    }
}

/// Typography used for measuring body text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub font_family: String,
    /// Font size in points
    pub font_size_pt: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Georgia".to_string(),
            font_size_pt: 12.0,
            line_height: 1.4,
        }
    }
}

impl Typography {
    /// Font size in CSS pixels
    pub fn font_size_px(&self) -> f32 {
        self.font_size_pt * 96.0 / 72.0
    }

    /// Height of one line in CSS pixels
    pub fn line_height_px(&self) -> f32 {
        self.font_size_px() * self.line_height
    }
}

/// Page management switches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageManagement {
    /// Flag pages holding a single short line
    pub orphan_control: bool,
    /// Start a new page at every heading during initial layout
    pub chapter_breaks: bool,
    /// Show page numbers in rendered output
    pub page_numbers: bool,
}

impl Default for PageManagement {
    fn default() -> Self {
        Self {
            orphan_control: true,
            chapter_breaks: false,
            page_numbers: false,
        }
    }
}

/// Which pages receive a half-page illustration placeholder on import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IllustrationFrequency {
    #[default]
    None,
    Every,
    /// Even-numbered pages
    Alternate,
    /// Only the first page
    FirstPage,
}

impl IllustrationFrequency {
    /// Whether the 1-based page number gets an illustration
    pub fn applies_to(&self, page_number: usize) -> bool {
        match self {
            IllustrationFrequency::None => false,
            IllustrationFrequency::Every => true,
            IllustrationFrequency::Alternate => page_number % 2 == 0,
            IllustrationFrequency::FirstPage => page_number == 1,
        }
    }
}

/// Fill ratio thresholds for page status buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FillThresholds {
    pub optimal: f32,
    pub near_full: f32,
    pub full: f32,
}

impl Default for FillThresholds {
    fn default() -> Self {
        Self {
            optimal: 0.70,
            near_full: 0.90,
            full: 1.00,
        }
    }
}

/// Constants that drive the reflow engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowTuning {
    /// Minimum free space before content is pulled from the next page
    pub pull_threshold_px: f32,
    /// Height reserved by a half-page image placeholder
    pub half_image_height_px: f32,
    /// Height reserved by a full-page image placeholder
    pub full_image_height_px: f32,
    /// Spacing added after each paragraph
    pub paragraph_spacing_px: f32,
    /// Page header and toolbar reserve
    pub chrome_reserve_px: f32,
    /// Horizontal gutter subtracted from the text width
    pub gutter_px: f32,
    pub min_content_height_px: f32,
    pub min_content_width_px: f32,
    pub fill_thresholds: FillThresholds,
    /// Quiet period before a scheduled reflow runs
    pub debounce_ms: u64,
    /// Maximum undo history depth
    pub undo_depth: usize,
    pub illustration_frequency: IllustrationFrequency,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            pull_threshold_px: 150.0,
            half_image_height_px: 180.0,
            full_image_height_px: 350.0,
            paragraph_spacing_px: 20.0,
            chrome_reserve_px: 110.0,
            gutter_px: 40.0,
            min_content_height_px: 200.0,
            min_content_width_px: 200.0,
            fill_thresholds: FillThresholds::default(),
            debounce_ms: 500,
            undo_depth: 20,
            illustration_frequency: IllustrationFrequency::None,
        }
    }
}

/// Named settings presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Children,
    Adult,
    Picture,
}

impl Preset {
    /// Look up a preset by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "children" => Some(Preset::Children),
            "adult" => Some(Preset::Adult),
            "picture" => Some(Preset::Picture),
            _ => None,
        }
    }
}

/// Complete page settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettings {
    pub book_size: BookSize,
    pub margins: Margins,
    pub typography: Typography,
    pub page_management: PageManagement,
    pub tuning: FlowTuning,
}

impl PageSettings {
    /// Build settings from a preset, keeping default tuning
    pub fn from_preset(preset: Preset) -> Self {
        let (book_size, margins, typography, page_management) = match preset {
            Preset::Children => (
                BookSize::Illustration,
                Margins::uniform(0.75),
                Typography {
                    font_family: "Arial".to_string(),
                    font_size_pt: 14.0,
                    line_height: 1.5,
                },
                PageManagement {
                    orphan_control: true,
                    chapter_breaks: true,
                    page_numbers: false,
                },
            ),
            Preset::Adult => (
                BookSize::Standard,
                Margins::default(),
                Typography {
                    font_family: "Times New Roman".to_string(),
                    font_size_pt: 12.0,
                    line_height: 1.4,
                },
                PageManagement {
                    orphan_control: true,
                    chapter_breaks: true,
                    page_numbers: true,
                },
            ),
            Preset::Picture => (
                BookSize::Illustration,
                Margins::uniform(0.5),
                Typography {
                    font_family: "Arial".to_string(),
                    font_size_pt: 16.0,
                    line_height: 1.6,
                },
                PageManagement {
                    orphan_control: false,
                    chapter_breaks: false,
                    page_numbers: false,
                },
            ),
        };

        Self {
            book_size,
            margins,
            typography,
            page_management,
            tuning: FlowTuning::default(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_dimensions() {
        assert_eq!(BookSize::Standard.dimensions_in(), (5.5, 8.5));
        assert_eq!(BookSize::Illustration.dimensions_in(), (8.0, 8.0));
        let custom = BookSize::Custom {
            width_in: 6.0,
            height_in: 9.0,
        };
        assert_eq!(custom.dimensions_in(), (6.0, 9.0));
    }

    #[test]
    fn test_typography_pixels() {
        let typography = Typography::default();
        assert_eq!(typography.font_size_px(), 16.0);
        assert!((typography.line_height_px() - 22.4).abs() < 1e-4);
    }

    #[test]
    fn test_illustration_frequency() {
        assert!(!IllustrationFrequency::None.applies_to(1));
        assert!(IllustrationFrequency::Every.applies_to(3));
        assert!(IllustrationFrequency::Alternate.applies_to(2));
        assert!(!IllustrationFrequency::Alternate.applies_to(3));
        assert!(IllustrationFrequency::FirstPage.applies_to(1));
        assert!(!IllustrationFrequency::FirstPage.applies_to(2));
    }

    #[test]
    fn test_presets() {
        assert_eq!(Preset::from_name("Picture"), Some(Preset::Picture));
        assert_eq!(Preset::from_name("novel"), None);

        let children = PageSettings::from_preset(Preset::Children);
        assert_eq!(children.book_size, BookSize::Illustration);
        assert_eq!(children.typography.font_size_pt, 14.0);
        assert!(children.page_management.chapter_breaks);
    }

    #[test]
    fn test_json_roundtrip_and_partial_import() {
        let settings = PageSettings::from_preset(Preset::Adult);
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"bookSize\""));
        assert_eq!(PageSettings::from_json(&json).unwrap(), settings);

        let partial = PageSettings::from_json(r#"{"tuning": {"pullThresholdPx": 90.0}}"#).unwrap();
        assert_eq!(partial.tuning.pull_threshold_px, 90.0);
        assert_eq!(partial.tuning.half_image_height_px, 180.0);
        assert_eq!(partial.margins, Margins::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(PageSettings::from_json("{not json").is_err());
    }
}
