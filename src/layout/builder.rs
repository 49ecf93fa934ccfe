//! Initial pagination of an imported document

use crate::document::{join_paragraphs, ImageKind, ImagePlaceholder, Page, Paragraph};
use crate::error::{Error, Result};
use crate::layout::{LayoutContext, TextMeasurer};

/// Paragraphs collected for the page being filled
struct PageBucket<'p> {
    number: usize,
    paragraphs: Vec<&'p Paragraph>,
    images: Vec<ImagePlaceholder>,
    height: f32,
}

impl<'p> PageBucket<'p> {
    fn open(number: usize, images: Vec<ImagePlaceholder>) -> Self {
        Self {
            number,
            paragraphs: Vec::new(),
            images,
            height: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    fn close(self) -> Page {
        let texts: Vec<&str> = self.paragraphs.iter().map(|p| p.content.as_str()).collect();
        let mut page = Page::with_content(self.number, join_paragraphs(&texts));
        page.set_has_heading(self.paragraphs.iter().any(|p| p.is_heading));
        *page.images_mut() = self.images;
        page
    }
}

/// Distribute paragraphs over pages, filling each up to its available height.
///
/// A paragraph taller than a whole page is placed alone on its page; nothing
/// is dropped or split. With chapter breaks enabled, every heading starts a
/// new page.
pub fn build_pages<M: TextMeasurer + ?Sized>(
    paragraphs: &[Paragraph],
    ctx: &LayoutContext<'_, M>,
) -> Result<Vec<Page>> {
    if paragraphs.iter().all(|p| p.content.trim().is_empty()) {
        return Err(Error::EmptyDocument);
    }

    let settings = ctx.settings();
    let chapter_breaks = settings.page_management.chapter_breaks;
    let frequency = settings.tuning.illustration_frequency;
    let spacing = ctx.paragraph_spacing();

    let mut image_seq: u64 = 1;
    let mut images_for = |number: usize| -> Vec<ImagePlaceholder> {
        if frequency.applies_to(number) {
            let id = format!("img_{}_{}", number, image_seq);
            image_seq += 1;
            vec![ImagePlaceholder {
                kind: ImageKind::Half,
                id,
            }]
        } else {
            Vec::new()
        }
    };

    let mut pages = Vec::new();
    let mut bucket = PageBucket::open(1, images_for(1));
    let mut available = ctx.available_height(&bucket.images);

    for paragraph in paragraphs.iter().filter(|p| !p.content.trim().is_empty()) {
        let height = ctx.paragraph_height(&paragraph.content)?;

        let heading_break = chapter_breaks && paragraph.is_heading;
        if !bucket.is_empty() && (heading_break || bucket.height + height > available) {
            let number = bucket.number + 1;
            let finished = std::mem::replace(&mut bucket, PageBucket::open(number, images_for(number)));
            log::debug!(
                "page {} closed with {} paragraphs ({:.0}px of {:.0}px)",
                finished.number,
                finished.paragraphs.len(),
                finished.height,
                available
            );
            pages.push(finished.close());
            available = ctx.available_height(&bucket.images);
        }

        bucket.paragraphs.push(paragraph);
        bucket.height += height + spacing;
    }

    if !bucket.is_empty() {
        pages.push(bucket.close());
    }

    log::info!(
        "paginated {} paragraphs into {} pages",
        paragraphs.len(),
        pages.len()
    );

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CharGridMeasurer, FnMeasurer, MeasureError};
    use crate::settings::{IllustrationFrequency, PageSettings, Typography};

    fn fixed_height(
        height: f32,
    ) -> FnMeasurer<impl Fn(&str, f32, &Typography) -> std::result::Result<f32, MeasureError>> {
        FnMeasurer(move |_: &str, _: f32, _: &Typography| -> std::result::Result<f32, MeasureError> {
            Ok(height)
        })
    }

    fn paras(texts: &[&str]) -> Vec<Paragraph> {
        texts.iter().map(|t| Paragraph::body(*t)).collect()
    }

    #[test]
    fn test_empty_input() {
        let measurer = CharGridMeasurer::new(40, 20.0);
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);
        assert!(matches!(build_pages(&[], &ctx), Err(Error::EmptyDocument)));
        assert!(matches!(
            build_pages(&paras(&["  ", ""]), &ctx),
            Err(Error::EmptyDocument)
        ));
    }

    #[test]
    fn test_fills_pages_greedily() {
        // 562px available; each paragraph costs 200 + 20
        let measurer = fixed_height(200.0);
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        let pages = build_pages(&paras(&["a", "b", "c", "d", "e"]), &ctx).unwrap();
        let contents: Vec<&str> = pages.iter().map(|p| p.content()).collect();
        assert_eq!(contents, vec!["a\n\nb", "c\n\nd", "e"]);
        assert_eq!(pages.iter().map(|p| p.number()).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_oversized_paragraph_kept_alone() {
        let measurer = fixed_height(2000.0);
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        let pages = build_pages(&paras(&["huge", "also huge"]), &ctx).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].content(), "huge");
        assert_eq!(pages[1].content(), "also huge");
    }

    #[test]
    fn test_no_content_loss() {
        let measurer = CharGridMeasurer::new(30, 22.0);
        let settings = PageSettings::default();
        let ctx = LayoutContext::new(&measurer, &settings);

        let input: Vec<Paragraph> = (0..60)
            .map(|i| Paragraph::body(format!("Paragraph {} {}", i, "text ".repeat(i % 17))))
            .collect();
        let pages = build_pages(&input, &ctx).unwrap();

        let input_chars: usize = input.iter().map(|p| p.char_count()).sum();
        let page_chars: usize = pages.iter().map(|p| p.character_count()).sum();
        let separators = 2 * (input.len() - pages.len());
        assert_eq!(page_chars, input_chars + separators);

        let rebuilt: Vec<String> = pages
            .iter()
            .flat_map(|p| p.paragraphs().into_iter().map(str::to_string))
            .collect();
        let original: Vec<String> = input.iter().map(|p| p.content.trim().to_string()).collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_chapter_breaks() {
        let measurer = fixed_height(20.0);
        let mut settings = PageSettings::default();
        settings.page_management.chapter_breaks = true;
        let ctx = LayoutContext::new(&measurer, &settings);

        let input = vec![
            Paragraph::new("Chapter 1"),
            Paragraph::body("Body one."),
            Paragraph::new("Chapter 2"),
            Paragraph::body("Body two."),
        ];
        let pages = build_pages(&input, &ctx).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].has_heading());
        assert_eq!(pages[1].content(), "Chapter 2\n\nBody two.");
    }

    #[test]
    fn test_illustrations_reduce_capacity() {
        // Without images: 562px fits two 200px paragraphs.
        // With a half image: 382px fits only one.
        let measurer = fixed_height(200.0);
        let mut settings = PageSettings::default();
        settings.tuning.illustration_frequency = IllustrationFrequency::Every;
        let ctx = LayoutContext::new(&measurer, &settings);

        let pages = build_pages(&paras(&["a", "b", "c"]), &ctx).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.images().len() == 1));
        assert_eq!(pages[1].images()[0].id, "img_2_2");
    }
}
