//! Page geometry: how much room a page leaves for text

use crate::settings::{BookSize, FlowTuning, Margins, PageSettings};

/// CSS pixels per inch
pub const DPI: f32 = 96.0;

/// Page dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_inside: f32,
    pub margin_outside: f32,
    /// Header and toolbar reserve
    pub chrome_reserve: f32,
    pub gutter: f32,
    pub min_content_height: f32,
    pub min_content_width: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(BookSize::default(), Margins::default(), &FlowTuning::default())
    }
}

impl PageGeometry {
    pub fn new(book_size: BookSize, margins: Margins, tuning: &FlowTuning) -> Self {
        let (width_in, height_in) = book_size.dimensions_in();
        Self {
            page_width: width_in * DPI,
            page_height: height_in * DPI,
            margin_top: margins.top * DPI,
            margin_bottom: margins.bottom * DPI,
            margin_inside: margins.inside * DPI,
            margin_outside: margins.outside * DPI,
            chrome_reserve: tuning.chrome_reserve_px,
            gutter: tuning.gutter_px,
            min_content_height: tuning.min_content_height_px,
            min_content_width: tuning.min_content_width_px,
        }
    }

    pub fn from_settings(settings: &PageSettings) -> Self {
        Self::new(settings.book_size, settings.margins, &settings.tuning)
    }

    /// Usable text height after reserving `image_budget` pixels for images
    pub fn content_height(&self, image_budget: f32) -> f32 {
        let height = self.page_height
            - self.margin_top
            - self.margin_bottom
            - self.chrome_reserve
            - image_budget;
        height.max(self.min_content_height)
    }

    /// Usable text width
    pub fn content_width(&self) -> f32 {
        let width = self.page_width - self.margin_inside - self.margin_outside - self.gutter;
        width.max(self.min_content_width)
    }
}

/// Available text height for a page size, margins and image reserve
pub fn available_height(
    book_size: BookSize,
    margins: Margins,
    image_budget: f32,
    tuning: &FlowTuning,
) -> f32 {
    PageGeometry::new(book_size, margins, tuning).content_height(image_budget)
}

/// Available text width for a page size and margins
pub fn available_width(book_size: BookSize, margins: Margins, tuning: &FlowTuning) -> f32 {
    PageGeometry::new(book_size, margins, tuning).content_width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_page() {
        let geometry = PageGeometry::default();
        // 8.5in * 96 - 2 * 72 - 110
        assert_eq!(geometry.content_height(0.0), 562.0);
        // 5.5in * 96 - 2 * 48 - 40
        assert_eq!(geometry.content_width(), 392.0);
    }

    #[test]
    fn test_images_reduce_height() {
        let tuning = FlowTuning::default();
        let h = available_height(BookSize::Standard, Margins::default(), 180.0, &tuning);
        assert_eq!(h, 382.0);
    }

    #[test]
    fn test_floors() {
        let tuning = FlowTuning::default();
        let tiny = BookSize::Custom {
            width_in: 2.0,
            height_in: 2.0,
        };
        assert_eq!(available_height(tiny, Margins::default(), 0.0, &tuning), 200.0);
        assert_eq!(available_width(tiny, Margins::default(), &tuning), 200.0);
        assert_eq!(
            available_height(BookSize::Standard, Margins::default(), 10_000.0, &tuning),
            200.0
        );
    }
}
