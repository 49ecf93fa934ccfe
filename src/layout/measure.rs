//! Text measurement
//!
//! The reflow engine only needs one capability from the rendering surface:
//! how tall a piece of text is once wrapped at a given width. That capability
//! sits behind [`TextMeasurer`] so layout can run headlessly.

use thiserror::Error;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::font::FontMetrics;
use crate::settings::Typography;

/// Failure reported by a text measurer
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct MeasureError(pub String);

impl MeasureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Measures the rendered height of text
pub trait TextMeasurer {
    /// Height in pixels of `text` wrapped at `width_px`.
    ///
    /// Empty or whitespace-only text still occupies one line.
    fn measure(&self, text: &str, width_px: f32, typography: &Typography)
        -> Result<f32, MeasureError>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, width_px: f32, typography: &Typography) -> Result<f32, MeasureError> {
        (**self).measure(text, width_px, typography)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, width_px: f32, typography: &Typography) -> Result<f32, MeasureError> {
        (**self).measure(text, width_px, typography)
    }
}

/// Measurer backed by a closure
pub struct FnMeasurer<F>(pub F);

impl<F> TextMeasurer for FnMeasurer<F>
where
    F: Fn(&str, f32, &Typography) -> Result<f32, MeasureError>,
{
    fn measure(&self, text: &str, width_px: f32, typography: &Typography) -> Result<f32, MeasureError> {
        (self.0)(text, width_px, typography)
    }
}

/// Greedy line-breaking measurer using approximate font metrics.
///
/// Break opportunities follow UAX #14; a word wider than the line is broken
/// between grapheme clusters.
#[derive(Debug, Clone, Default)]
pub struct LineBreakMeasurer {
    /// Overrides metrics derived from the typography
    metrics: Option<FontMetrics>,
}

impl LineBreakMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use fixed metrics regardless of the typography passed in
    pub fn with_metrics(metrics: FontMetrics) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    /// Count wrapped lines for `text`
    pub fn line_count(&self, text: &str, max_width: f32, metrics: &FontMetrics) -> usize {
        if text.trim().is_empty() {
            return 1;
        }

        let max_width = max_width.max(1.0);
        let mut lines = 1;
        let mut x: f32 = 0.0;
        let mut seg_start = 0;

        for (pos, opportunity) in linebreaks(text) {
            let segment = &text[seg_start..pos];
            seg_start = pos;

            // Trailing spaces and the newline itself may hang past the edge
            let visible = segment.trim_end();
            let visible_width = text_width(visible, metrics);
            let full_width = text_width(segment.trim_end_matches(['\n', '\r']), metrics);

            if x > 0.0 && x + visible_width > max_width {
                lines += 1;
                x = 0.0;
            }

            if visible_width > max_width {
                // Emergency break inside the word
                for grapheme in visible.graphemes(true) {
                    let w = metrics.grapheme_width(grapheme);
                    if x > 0.0 && x + w > max_width {
                        lines += 1;
                        x = 0.0;
                    }
                    x += w;
                }
                x += full_width - visible_width;
            } else {
                x += full_width;
            }

            if opportunity == BreakOpportunity::Mandatory && pos < text.len() {
                lines += 1;
                x = 0.0;
            }
        }

        lines
    }
}

fn text_width(text: &str, metrics: &FontMetrics) -> f32 {
    text.graphemes(true).map(|g| metrics.grapheme_width(g)).sum()
}

impl TextMeasurer for LineBreakMeasurer {
    fn measure(&self, text: &str, width_px: f32, typography: &Typography) -> Result<f32, MeasureError> {
        let derived;
        let metrics = match &self.metrics {
            Some(m) => m,
            None => {
                derived = FontMetrics::for_typography(typography);
                &derived
            }
        };

        let lines = self.line_count(text, width_px, metrics);
        Ok(lines as f32 * metrics.line_height)
    }
}

/// Deterministic measurer: a fixed number of characters per line.
///
/// Each source line takes `ceil(chars / chars_per_line)` lines (at least one);
/// width and typography are ignored.
#[derive(Debug, Clone, Copy)]
pub struct CharGridMeasurer {
    pub chars_per_line: usize,
    pub line_height: f32,
}

impl CharGridMeasurer {
    pub fn new(chars_per_line: usize, line_height: f32) -> Self {
        Self {
            chars_per_line: chars_per_line.max(1),
            line_height,
        }
    }
}

impl TextMeasurer for CharGridMeasurer {
    fn measure(&self, text: &str, _width_px: f32, _typography: &Typography) -> Result<f32, MeasureError> {
        if text.trim().is_empty() {
            return Ok(self.line_height);
        }

        let lines: usize = text
            .split('\n')
            .map(|line| {
                let chars = line.chars().count();
                ((chars + self.chars_per_line - 1) / self.chars_per_line).max(1)
            })
            .sum();

        Ok(lines as f32 * self.line_height)
    }
}
