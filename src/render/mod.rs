//! Render seam: what the UI is told after the page list changes

use std::ops::Range;

use serde::Serialize;

use crate::document::{FillState, ImagePlaceholder, Page, PageFill};

/// Draws pages. The engine never draws anything itself.
pub trait Renderer {
    /// Redraw every page after a structural change
    fn render_all(&mut self, pages: &[Page]);

    /// Redraw the pages in `range` after a content-only change
    fn refresh_pages(&mut self, range: Range<usize>, pages: &[Page]);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_all(&mut self, _pages: &[Page]) {}

    fn refresh_pages(&mut self, _range: Range<usize>, _pages: &[Page]) {}
}

/// Serializable summary of one page for a UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub number: usize,
    pub content: String,
    pub character_count: usize,
    pub images: Vec<ImagePlaceholder>,
    pub fill_state: FillState,
    pub fill_ratio: f32,
    /// Percentage, "FULL" or "OVERFLOW"
    pub indicator: String,
    /// "Flowing..." or "Ready"
    pub status: &'static str,
    pub orphan: bool,
}

impl PageView {
    pub fn new(page: &Page, fill: &PageFill, orphan_control: bool) -> Self {
        Self {
            number: page.number(),
            content: page.content().to_string(),
            character_count: page.character_count(),
            images: page.images().to_vec(),
            fill_state: fill.state,
            fill_ratio: fill.ratio,
            indicator: fill.indicator(),
            status: fill.state.status_text(),
            orphan: orphan_control && page.is_orphan(),
        }
    }
}
