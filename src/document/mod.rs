//! Document model: an ordered sequence of pages

mod page;
mod paragraph;

pub use page::{image_budget, FillState, ImageKind, ImagePlaceholder, Page, PageFill};
pub use paragraph::{
    is_likely_heading, join_paragraphs, split_blank_lines, split_paragraph_texts, split_paragraphs,
    Paragraph, PARAGRAPH_SEPARATOR,
};

use crate::error::{Error, Result};

/// The page sequence owned by the editor.
///
/// Page numbers are kept contiguous: `pages[i].number() == i + 1` holds after
/// every mutating method returns.
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Page>,
    /// Monotonic counter for image placeholder ids
    next_image_seq: u64,
    /// Monotonic version counter
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding one blank page
    pub fn new() -> Self {
        Self {
            pages: vec![Page::blank(1)],
            next_image_seq: 1,
            version: 0,
        }
    }

    /// Create a document from laid-out pages
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let mut doc = Self {
            pages,
            next_image_seq: 1,
            version: 0,
        };
        if doc.pages.is_empty() {
            doc.pages.push(Page::blank(1));
        }
        doc.next_image_seq = doc.image_count() as u64 + 1;
        doc.renumber();
        doc
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Fail with `InvalidPageIndex` unless `index` names a page
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(Error::InvalidPageIndex {
                index,
                page_count: self.pages.len(),
            })
        }
    }

    pub fn page(&self, index: usize) -> Result<&Page> {
        self.check_index(index)?;
        Ok(&self.pages[index])
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Result<&mut Page> {
        self.check_index(index)?;
        self.version += 1;
        Ok(&mut self.pages[index])
    }

    /// Replace a page's content
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<()> {
        self.page_mut(index)?.set_content(content);
        Ok(())
    }

    /// Insert a blank page at `index` (may equal `len()`)
    pub fn insert_blank_page(&mut self, index: usize) -> Result<()> {
        if index > self.pages.len() {
            return Err(Error::InvalidPageIndex {
                index,
                page_count: self.pages.len(),
            });
        }
        self.pages.insert(index, Page::blank(index + 1));
        self.version += 1;
        self.renumber();
        Ok(())
    }

    /// Append blank pages until `index` exists
    pub fn ensure_page(&mut self, index: usize) -> usize {
        let mut created = 0;
        while self.pages.len() <= index {
            let number = self.pages.len() + 1;
            self.pages.push(Page::blank(number));
            created += 1;
        }
        if created > 0 {
            self.version += 1;
        }
        created
    }

    /// Remove a page and renumber. Callers relocate content first.
    pub(crate) fn remove_page(&mut self, index: usize) -> Result<Page> {
        self.check_index(index)?;
        let page = self.pages.remove(index);
        self.version += 1;
        self.renumber();
        Ok(page)
    }

    /// Replace every page, e.g. when restoring an undo snapshot
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        self.pages = pages;
        if self.pages.is_empty() {
            self.pages.push(Page::blank(1));
        }
        self.next_image_seq = self.next_image_seq.max(self.image_count() as u64 + 1);
        self.version += 1;
        self.renumber();
    }

    /// Restore `number == index + 1` on every page
    pub fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.set_number(i + 1);
        }
    }

    /// Allocate a unique image id for a page
    pub(crate) fn next_image_id(&mut self, page_number: usize) -> String {
        let id = format!("img_{}_{}", page_number, self.next_image_seq);
        self.next_image_seq += 1;
        id
    }

    /// Total number of image placeholders
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images().len()).sum()
    }

    /// Every paragraph in page order
    pub fn paragraphs(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|p| p.paragraphs()).collect()
    }

    /// The whole text, paragraphs joined in page order
    pub fn text(&self) -> String {
        join_paragraphs(&self.paragraphs())
    }

    /// Sum of page character counts
    pub fn total_characters(&self) -> usize {
        self.pages.iter().map(|p| p.character_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(doc: &Document) -> Vec<usize> {
        doc.pages().iter().map(|p| p.number()).collect()
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert!(doc.pages()[0].is_blank());
    }

    #[test]
    fn test_from_pages_renumbers() {
        let doc = Document::from_pages(vec![
            Page::with_content(7, "a"),
            Page::with_content(3, "b"),
        ]);
        assert_eq!(numbers(&doc), vec![1, 2]);
        assert_eq!(doc.text(), "a\n\nb");
    }

    #[test]
    fn test_insert_and_remove_keep_numbers_contiguous() {
        let mut doc = Document::from_pages(vec![Page::with_content(1, "a")]);
        doc.insert_blank_page(0).unwrap();
        doc.insert_blank_page(2).unwrap();
        assert_eq!(numbers(&doc), vec![1, 2, 3]);
        assert_eq!(doc.pages()[1].content(), "a");

        doc.remove_page(0).unwrap();
        assert_eq!(numbers(&doc), vec![1, 2]);
        assert!(doc.insert_blank_page(5).is_err());
    }

    #[test]
    fn test_invalid_index() {
        let doc = Document::new();
        match doc.page(3) {
            Err(Error::InvalidPageIndex { index, page_count }) => {
                assert_eq!(index, 3);
                assert_eq!(page_count, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ensure_page() {
        let mut doc = Document::new();
        assert_eq!(doc.ensure_page(2), 2);
        assert_eq!(doc.ensure_page(1), 0);
        assert_eq!(numbers(&doc), vec![1, 2, 3]);
    }

    #[test]
    fn test_image_ids_unique() {
        let mut doc = Document::new();
        let a = doc.next_image_id(1);
        let b = doc.next_image_id(1);
        assert_ne!(a, b);
        assert!(a.starts_with("img_1_"));
    }
}
