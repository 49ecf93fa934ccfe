//! Page operations and their results
//!
//! Each operation validates its input, records an undo snapshot and then
//! mutates the document. None of them reflows; the caller decides what to
//! reflow afterwards.

use std::ops::Range;

use crate::document::{join_paragraphs, split_paragraph_texts, Document, ImageKind, ImagePlaceholder};
use crate::editing::break_point::{byte_offset, find_break_point};
use crate::editing::Confirmation;
use crate::error::{Error, Result};
use crate::undo::UndoRecorder;

/// User-visible page operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    MoveParagraph,
    SplitPage,
    CreatePage,
    DeletePage,
    InsertImage,
    RemoveImage,
}

impl PageAction {
    /// Label stored with the undo snapshot
    pub fn label(&self) -> &'static str {
        match self {
            PageAction::MoveParagraph => "move paragraph",
            PageAction::SplitPage => "force page break",
            PageAction::CreatePage => "create new page",
            PageAction::DeletePage => "delete page",
            PageAction::InsertImage => "insert image placeholder",
            PageAction::RemoveImage => "remove image placeholder",
        }
    }
}

/// What an operation touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Pages whose content changed
    pub affected: Range<usize>,
    /// Pages were inserted or removed
    pub structural: bool,
}

impl EditOutcome {
    fn content(affected: Range<usize>) -> Self {
        Self {
            affected,
            structural: false,
        }
    }

    fn structural(affected: Range<usize>) -> Self {
        Self {
            affected,
            structural: true,
        }
    }
}

/// Result of deleting a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Index, after removal, of the page that received the deleted content
    pub merge_target: Option<usize>,
}

/// Move the last paragraph of page `index` to the front of the next page,
/// creating that page at the end of the document.
pub fn move_last_paragraph_to_next(
    document: &mut Document,
    index: usize,
    recorder: &mut dyn UndoRecorder,
) -> Result<EditOutcome> {
    let page = document.page(index)?;
    let mut paragraphs: Vec<String> = split_paragraph_texts(page.content())
        .into_iter()
        .map(str::to_string)
        .collect();
    if paragraphs.len() < 2 {
        return Err(Error::InsufficientParagraphs {
            page: index,
            found: paragraphs.len(),
        });
    }

    recorder.snapshot(PageAction::MoveParagraph.label(), document.pages());

    let moved = paragraphs.pop().unwrap_or_default();
    document.set_content(index, join_paragraphs(&paragraphs))?;

    let created = document.ensure_page(index + 1) > 0;
    document.page_mut(index + 1)?.prepend(&moved);

    log::info!("moved last paragraph of page {} to page {}", index + 1, index + 2);
    Ok(EditOutcome {
        affected: index..index + 2,
        structural: created,
    })
}

/// Split page `index` in two.
///
/// With a caret (char offset into the page content) the split happens
/// there; otherwise near the middle of the page at a natural break. Text after
/// the split goes to a new page inserted right after, unless it is empty.
pub fn split_page(
    document: &mut Document,
    index: usize,
    caret: Option<usize>,
    recorder: &mut dyn UndoRecorder,
) -> Result<EditOutcome> {
    let content = document.page(index)?.content();
    let point = match caret {
        Some(caret) => caret,
        None => find_break_point(content, content.chars().count() / 2),
    };
    let offset = byte_offset(content, point);
    let before = content[..offset].trim().to_string();
    let after = content[offset..].trim().to_string();

    recorder.snapshot(PageAction::SplitPage.label(), document.pages());
    document.set_content(index, before)?;

    if after.is_empty() {
        return Ok(EditOutcome::content(index..index + 1));
    }

    document.insert_blank_page(index + 1)?;
    document.set_content(index + 1, after)?;
    log::info!("split page {} at char {}", index + 1, point);
    Ok(EditOutcome::structural(index..index + 2))
}

/// Insert a blank page after page `index`
pub fn create_page_after(
    document: &mut Document,
    index: usize,
    recorder: &mut dyn UndoRecorder,
) -> Result<EditOutcome> {
    document.check_index(index)?;
    recorder.snapshot(PageAction::CreatePage.label(), document.pages());
    document.insert_blank_page(index + 1)?;
    log::info!("created page {}", index + 2);
    Ok(EditOutcome::structural(index + 1..index + 2))
}

/// Delete page `index`, merging its content into the next page (or the
/// previous one when it is the last page).
pub fn delete_page(
    document: &mut Document,
    index: usize,
    confirm: &mut dyn Confirmation,
    recorder: &mut dyn UndoRecorder,
) -> Result<DeleteOutcome> {
    if document.len() <= 1 {
        return Err(Error::CannotDeleteOnlyPage);
    }
    document.check_index(index)?;

    if !confirm.confirm(
        "Are you sure you want to delete this page? The content will be merged with adjacent pages.",
    ) {
        return Err(Error::Cancelled);
    }

    recorder.snapshot(PageAction::DeletePage.label(), document.pages());

    let deleted = document.page(index)?.content().trim().to_string();
    let mut merge_target = None;

    if !deleted.is_empty() {
        if index + 1 < document.len() {
            document.page_mut(index + 1)?.prepend(&deleted);
            // The next page shifts into the deleted slot
            merge_target = Some(index);
        } else {
            document.page_mut(index - 1)?.append(&deleted);
            merge_target = Some(index - 1);
        }
    }

    let removed = document.remove_page(index)?;
    if !removed.images().is_empty() {
        log::debug!(
            "dropped {} image placeholders with page {}",
            removed.images().len(),
            index + 1
        );
    }

    log::info!("deleted page {}", index + 1);
    Ok(DeleteOutcome { merge_target })
}

/// Add an image placeholder to page `index`, returning its id
pub fn insert_image(
    document: &mut Document,
    index: usize,
    kind: ImageKind,
    recorder: &mut dyn UndoRecorder,
) -> Result<String> {
    document.check_index(index)?;
    recorder.snapshot(PageAction::InsertImage.label(), document.pages());

    let number = document.page(index)?.number();
    let id = document.next_image_id(number);
    document.page_mut(index)?.images_mut().push(ImagePlaceholder {
        kind,
        id: id.clone(),
    });
    Ok(id)
}

/// Remove the image placeholder `id` from page `index`
pub fn remove_image(
    document: &mut Document,
    index: usize,
    id: &str,
    recorder: &mut dyn UndoRecorder,
) -> Result<ImagePlaceholder> {
    let position = document
        .page(index)?
        .images()
        .iter()
        .position(|image| image.id == id)
        .ok_or_else(|| Error::ImageNotFound {
            page: index,
            id: id.to_string(),
        })?;

    recorder.snapshot(PageAction::RemoveImage.label(), document.pages());
    Ok(document.page_mut(index)?.images_mut().remove(position))
}
