//! Layout: measurement, page geometry, initial pagination and reflow

mod builder;
pub mod font;
mod geometry;
mod measure;
mod reflow;
mod scheduler;

pub use builder::build_pages;
pub use font::FontMetrics;
pub use geometry::{available_height, available_width, PageGeometry, DPI};
pub use measure::{CharGridMeasurer, FnMeasurer, LineBreakMeasurer, MeasureError, TextMeasurer};
pub use reflow::{find_overflow, OverflowSplit, PullReport, ReflowEngine, ReflowReport};
pub use scheduler::{PendingReflow, ReflowScheduler};

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::document::{image_budget, split_blank_lines, FillState, ImagePlaceholder, Page, PageFill};
use crate::settings::PageSettings;

/// Everything a layout pass needs: the measurer, the settings and derived
/// geometry.
///
/// Paragraph heights are cached for the lifetime of the context, so a pass
/// measures each distinct paragraph once.
pub struct LayoutContext<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    settings: &'a PageSettings,
    geometry: PageGeometry,
    height_cache: RefCell<FxHashMap<String, f32>>,
}

impl<'a, M: TextMeasurer + ?Sized> LayoutContext<'a, M> {
    pub fn new(measurer: &'a M, settings: &'a PageSettings) -> Self {
        Self {
            measurer,
            settings,
            geometry: PageGeometry::from_settings(settings),
            height_cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn settings(&self) -> &PageSettings {
        self.settings
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Spacing added after each paragraph
    pub fn paragraph_spacing(&self) -> f32 {
        self.settings.tuning.paragraph_spacing_px
    }

    /// Measured height of one paragraph at the page's text width
    pub fn paragraph_height(&self, text: &str) -> Result<f32, MeasureError> {
        if let Some(h) = self.height_cache.borrow().get(text) {
            return Ok(*h);
        }

        let height = self.measurer.measure(
            text,
            self.geometry.content_width(),
            &self.settings.typography,
        )?;
        if !height.is_finite() || height < 0.0 {
            return Err(MeasureError::new(format!(
                "measurer returned invalid height {}",
                height
            )));
        }

        self.height_cache.borrow_mut().insert(text.to_string(), height);
        Ok(height)
    }

    /// Height used by page content: paragraph heights plus spacing between
    /// paragraphs. Blank content uses no height.
    pub fn content_height(&self, content: &str) -> Result<f32, MeasureError> {
        let spacing = self.paragraph_spacing();
        let mut total = 0.0;
        for (i, paragraph) in split_blank_lines(content).into_iter().enumerate() {
            if i > 0 {
                total += spacing;
            }
            total += self.paragraph_height(paragraph)?;
        }
        Ok(total)
    }

    /// Available text height on a page carrying `images`
    pub fn available_height(&self, images: &[ImagePlaceholder]) -> f32 {
        self.geometry
            .content_height(image_budget(images, &self.settings.tuning))
    }

    /// Measure how full a page is
    pub fn page_fill(&self, page: &Page) -> Result<PageFill, MeasureError> {
        let used_height = self.content_height(page.content())?;
        let available_height = self.available_height(page.images());
        let ratio = used_height / available_height;
        Ok(PageFill {
            used_height,
            available_height,
            ratio,
            state: FillState::from_ratio(ratio, &self.settings.tuning.fill_thresholds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ImageKind;
    use crate::settings::Typography;
    use std::cell::Cell;

    struct CountingMeasurer {
        calls: Cell<usize>,
    }

    impl TextMeasurer for CountingMeasurer {
        fn measure(&self, _text: &str, _w: f32, _t: &Typography) -> Result<f32, MeasureError> {
            self.calls.set(self.calls.get() + 1);
            Ok(100.0)
        }
    }

    #[test]
    fn test_content_height_adds_spacing() {
        let measurer = CountingMeasurer { calls: Cell::new(0) };
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        assert_eq!(ctx.content_height("").unwrap(), 0.0);
        assert_eq!(ctx.content_height("a").unwrap(), 100.0);
        assert_eq!(ctx.content_height("a\n\nb\n\nc").unwrap(), 340.0);
    }

    #[test]
    fn test_heights_are_cached() {
        let measurer = CountingMeasurer { calls: Cell::new(0) };
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        ctx.content_height("a\n\nb").unwrap();
        ctx.content_height("a\n\nb\n\na").unwrap();
        assert_eq!(measurer.calls.get(), 2);
    }

    #[test]
    fn test_page_fill() {
        let measurer = CountingMeasurer { calls: Cell::new(0) };
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        let mut page = Page::with_content(1, "a\n\nb\n\nc\n\nd\n\ne");
        // 5 * 100 + 4 * 20 = 580 against 562
        let fill = ctx.page_fill(&page).unwrap();
        assert_eq!(fill.state, FillState::Overflow);
        assert_eq!(fill.indicator(), "OVERFLOW");

        page.set_content("a");
        let fill = ctx.page_fill(&page).unwrap();
        assert_eq!(fill.state, FillState::Optimal);
        assert_eq!(fill.indicator(), "18%");

        page.images_mut().push(ImagePlaceholder {
            kind: ImageKind::Full,
            id: "img".into(),
        });
        assert_eq!(ctx.available_height(page.images()), 212.0);
    }

    #[test]
    fn test_invalid_height_rejected() {
        let measurer = FnMeasurer(|_: &str, _: f32, _: &Typography| -> Result<f32, MeasureError> {
            Ok(f32::NAN)
        });
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);
        assert!(ctx.paragraph_height("x").is_err());
    }
}
