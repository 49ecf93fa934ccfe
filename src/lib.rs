//! Pageflow: pagination and reflow engine for a book layout editor
//!
//! This crate keeps a flowed text document distributed over fixed-size pages
//! while the pages are edited:
//! - Initial layout fills pages paragraph by paragraph
//! - Incremental reflow pushes overflow forward and pulls content back
//! - Page operations (move, split, create, delete, illustrate) with undo
//! - Measurement is pluggable, with deterministic measurers for tests

pub mod document;
pub mod editing;
pub mod error;
pub mod layout;
pub mod render;
pub mod settings;
pub mod status;
pub mod undo;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{
    split_paragraphs, Document, FillState, ImageKind, ImagePlaceholder, Page, PageFill, Paragraph,
};
pub use editing::{AlwaysConfirm, Confirmation, PageAction};
pub use error::{Error, Result};
pub use layout::{
    CharGridMeasurer, FnMeasurer, LayoutContext, LineBreakMeasurer, MeasureError, PullReport,
    ReflowReport, TextMeasurer,
};
pub use render::{NullRenderer, PageView, Renderer};
pub use settings::{PageSettings, Preset};
pub use status::{LogStatusSink, RecordingStatusSink, StatusLevel, StatusSink};
pub use undo::{UndoManager, UndoRecorder};

use layout::{build_pages, ReflowEngine, ReflowScheduler};

/// The editor state: document, settings and every collaborator
pub struct BookEditor<M: TextMeasurer> {
    document: Document,
    settings: PageSettings,
    measurer: M,
    engine: ReflowEngine,
    scheduler: ReflowScheduler,
    history: UndoManager,
    status: Box<dyn StatusSink>,
    renderer: Box<dyn Renderer>,
    confirmation: Box<dyn Confirmation>,
}

impl<M: TextMeasurer> BookEditor<M> {
    /// Create an editor with default settings and a single blank page
    pub fn new(measurer: M) -> Self {
        Self::with_settings(measurer, PageSettings::default())
    }

    pub fn with_settings(measurer: M, settings: PageSettings) -> Self {
        Self {
            document: Document::new(),
            scheduler: ReflowScheduler::new(settings.tuning.debounce_ms),
            history: UndoManager::new(settings.tuning.undo_depth),
            settings,
            measurer,
            engine: ReflowEngine::new(),
            status: Box::new(LogStatusSink),
            renderer: Box::new(NullRenderer),
            confirmation: Box::new(AlwaysConfirm),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_status_sink(mut self, status: impl StatusSink + 'static) -> Self {
        self.status = Box::new(status);
        self
    }

    pub fn with_confirmation(mut self, confirmation: impl Confirmation + 'static) -> Self {
        self.confirmation = Box::new(confirmation);
        self
    }

    pub fn set_confirmation(&mut self, confirmation: impl Confirmation + 'static) {
        self.confirmation = Box::new(confirmation);
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Swap the text measurer and reflow every page with it
    pub fn set_measurer(&mut self, measurer: M) -> Result<()> {
        self.measurer = measurer;
        self.reflow_all()
    }

    /// Apply new settings and reflow every page against them
    pub fn set_settings(&mut self, settings: PageSettings) -> Result<()> {
        self.scheduler.set_delay(settings.tuning.debounce_ms);
        self.history.set_max_depth(settings.tuning.undo_depth);
        self.settings = settings;
        self.reflow_all()?;
        self.status.report(StatusLevel::Success, "Settings applied");
        Ok(())
    }

    /// Split raw text into paragraphs and paginate it
    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let paragraphs = split_paragraphs(text);
        self.import_paragraphs(&paragraphs)
    }

    /// Paginate structured paragraphs, replacing the current document
    pub fn import_paragraphs(&mut self, paragraphs: &[Paragraph]) -> Result<usize> {
        let result = {
            let ctx = LayoutContext::new(&self.measurer, &self.settings);
            build_pages(paragraphs, &ctx)
        };
        let pages = self.notify(result)?;

        self.document = Document::from_pages(pages);
        self.history.clear();
        self.scheduler.cancel();
        self.renderer.render_all(self.document.pages());

        let count = self.document.len();
        self.status.report(
            StatusLevel::Success,
            &format!("Processed {} pages successfully!", count),
        );
        Ok(count)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn pages(&self) -> &[Page] {
        self.document.pages()
    }

    pub fn page_count(&self) -> usize {
        self.document.len()
    }

    pub fn is_reflowing(&self) -> bool {
        self.engine.is_reflowing()
    }

    /// Page index waiting for its debounced reflow
    pub fn pending_reflow(&self) -> Option<usize> {
        self.scheduler.pending().map(|p| p.page_index)
    }

    /// Replace a page's content as typed by the user.
    ///
    /// Shrinking content pulls from the next page right away; the forward
    /// reflow is debounced until `tick` sees the quiet period elapse.
    pub fn edit_page(&mut self, index: usize, content: &str, now_ms: u64) -> Result<()> {
        let result = self.document.page(index).map(|p| p.character_count());
        let previous = self.notify(result)?;

        let result = self.document.set_content(index, content);
        self.notify(result)?;
        self.renderer
            .refresh_pages(index..index + 1, self.document.pages());

        if content.chars().count() < previous {
            self.pull_forward(index)?;
        }
        self.scheduler.schedule(index, now_ms);
        Ok(())
    }

    /// Run the pending reflow once its quiet period has elapsed
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<ReflowReport>> {
        match self.scheduler.poll(now_ms) {
            Some(index) => self.run_scheduled(index).map(Some),
            None => Ok(None),
        }
    }

    /// Run the pending reflow immediately
    pub fn flush_pending(&mut self) -> Result<Option<ReflowReport>> {
        match self.scheduler.take() {
            Some(index) => self.run_scheduled(index).map(Some),
            None => Ok(None),
        }
    }

    fn run_scheduled(&mut self, index: usize) -> Result<ReflowReport> {
        // A deletion may have removed the page since it was scheduled
        let index = index.min(self.document.len().saturating_sub(1));
        self.reflow_now(index)
    }

    /// Reflow forward from page `index` without waiting
    pub fn reflow_now(&mut self, index: usize) -> Result<ReflowReport> {
        let result = self.reflow_from(index);
        let report = self.notify(result)?;
        if report.pages_created > 0 {
            self.status.report(
                StatusLevel::Info,
                &format!("Created {} new pages for overflow", report.pages_created),
            );
        }
        Ok(report)
    }

    /// Reflow every page in order
    pub fn reflow_all(&mut self) -> Result<()> {
        let mut index = 0;
        while index < self.document.len() {
            self.reflow_now(index)?;
            index += 1;
        }
        Ok(())
    }

    /// Pull content from the next page into page `index` if it has room
    pub fn pull_forward(&mut self, index: usize) -> Result<PullReport> {
        let result = {
            let ctx = LayoutContext::new(&self.measurer, &self.settings);
            self.engine
                .pull_forward(&mut self.document, &ctx, index, &mut self.history)
        };
        let report = self.notify(result)?;
        if report.changed() {
            self.renderer
                .refresh_pages(index..index + 2, self.document.pages());
        }
        Ok(report)
    }

    fn reflow_from(&mut self, index: usize) -> Result<ReflowReport> {
        let ctx = LayoutContext::new(&self.measurer, &self.settings);
        let report = self
            .engine
            .reflow(&mut self.document, &ctx, index, &mut self.history)?;

        if report.pages_created > 0 {
            self.renderer.render_all(self.document.pages());
        } else if let (Some(first), Some(last)) =
            (report.pages_touched.first(), report.pages_touched.last())
        {
            self.renderer
                .refresh_pages(*first..*last + 1, self.document.pages());
        }
        Ok(report)
    }

    pub fn move_last_paragraph_to_next(&mut self, index: usize) -> Result<()> {
        let result = editing::move_last_paragraph_to_next(&mut self.document, index, &mut self.history);
        let outcome = self.notify(result)?;
        self.render(outcome.structural, outcome.affected);
        self.status
            .report(StatusLevel::Success, "Last paragraph moved to next page!");
        Ok(())
    }

    /// Split page `index` at `caret` (a char offset), or near its middle
    pub fn split_at_cursor(&mut self, index: usize, caret: Option<usize>) -> Result<()> {
        let result = editing::split_page(&mut self.document, index, caret, &mut self.history);
        let outcome = self.notify(result)?;
        self.render(outcome.structural, outcome.affected);

        let message = match (caret, outcome.structural) {
            (_, false) => "Page content updated",
            (Some(_), true) => "Page split successfully at cursor position!",
            (None, true) => "Page split at midpoint",
        };
        self.status.report(StatusLevel::Success, message);
        Ok(())
    }

    pub fn create_page_after(&mut self, index: usize) -> Result<()> {
        let result = editing::create_page_after(&mut self.document, index, &mut self.history);
        let outcome = self.notify(result)?;
        self.render(outcome.structural, outcome.affected);
        self.status
            .report(StatusLevel::Success, "New page created successfully!");
        Ok(())
    }

    /// Delete a page after confirmation, merging its content into a neighbour
    /// and settling the neighbour.
    pub fn delete_page(&mut self, index: usize) -> Result<()> {
        let result = editing::delete_page(
            &mut self.document,
            index,
            self.confirmation.as_mut(),
            &mut self.history,
        );
        let outcome = self.notify(result)?;
        self.renderer.render_all(self.document.pages());

        if let Some(target) = outcome.merge_target {
            let report = self.reflow_now(target)?;
            if !report.changed() {
                self.pull_forward(target)?;
            }
        }

        self.status.report(
            StatusLevel::Success,
            "Page deleted and content merged successfully!",
        );
        Ok(())
    }

    /// Add an image placeholder and push displaced text forward
    pub fn insert_image(&mut self, index: usize, kind: ImageKind) -> Result<String> {
        let result = editing::insert_image(&mut self.document, index, kind, &mut self.history);
        let id = self.notify(result)?;
        self.renderer
            .refresh_pages(index..index + 1, self.document.pages());
        self.reflow_now(index)?;
        self.status
            .report(StatusLevel::Success, "Image placeholder inserted!");
        Ok(id)
    }

    /// Remove an image placeholder and pull text into the freed space
    pub fn remove_image(&mut self, index: usize, id: &str) -> Result<()> {
        let result = editing::remove_image(&mut self.document, index, id, &mut self.history);
        self.notify(result)?;
        self.renderer
            .refresh_pages(index..index + 1, self.document.pages());
        self.pull_forward(index)?;
        self.status.report(StatusLevel::Success, "Image placeholder removed");
        Ok(())
    }

    fn render(&mut self, structural: bool, affected: std::ops::Range<usize>) {
        if structural {
            self.renderer.render_all(self.document.pages());
        } else {
            self.renderer.refresh_pages(affected, self.document.pages());
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.document.pages()) {
            Some(snapshot) => {
                self.document.replace_pages(snapshot.pages);
                self.scheduler.cancel();
                self.renderer.render_all(self.document.pages());
                self.status
                    .report(StatusLevel::Info, &format!("Undone: {}", snapshot.label));
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.document.pages()) {
            Some(snapshot) => {
                self.document.replace_pages(snapshot.pages);
                self.scheduler.cancel();
                self.renderer.render_all(self.document.pages());
                self.status
                    .report(StatusLevel::Info, &format!("Redone: {}", snapshot.label));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Measure how full page `index` is
    pub fn page_fill(&self, index: usize) -> Result<PageFill> {
        let page = self.document.page(index)?;
        let ctx = LayoutContext::new(&self.measurer, &self.settings);
        Ok(ctx.page_fill(page)?)
    }

    pub fn fill_state(&self, index: usize) -> Result<FillState> {
        Ok(self.page_fill(index)?.state)
    }

    /// Pages holding a single short line, when orphan control is on
    pub fn orphan_pages(&self) -> Vec<usize> {
        if !self.settings.page_management.orphan_control {
            return Vec::new();
        }
        self.document
            .pages()
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_orphan())
            .map(|(i, _)| i)
            .collect()
    }

    /// Fill of every page, measured in one pass
    pub fn page_fills(&self) -> Result<Vec<PageFill>> {
        let ctx = LayoutContext::new(&self.measurer, &self.settings);
        let fills = self
            .document
            .pages()
            .iter()
            .map(|page| ctx.page_fill(page))
            .collect::<std::result::Result<Vec<_>, MeasureError>>()?;
        Ok(fills)
    }

    /// Summaries of every page for a UI
    pub fn views(&self) -> Result<Vec<PageView>> {
        let orphan_control = self.settings.page_management.orphan_control;
        let fills = self.page_fills()?;
        Ok(self
            .document
            .pages()
            .iter()
            .zip(&fills)
            .map(|(page, fill)| PageView::new(page, fill, orphan_control))
            .collect())
    }

    /// Send a failed operation's error to the status sink
    fn notify<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            let level = if err.is_warning() {
                StatusLevel::Warning
            } else {
                StatusLevel::Error
            };
            self.status.report(level, &err.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10px per character, one paragraph per line
    fn editor() -> BookEditor<CharGridMeasurer> {
        BookEditor::new(CharGridMeasurer::new(1, 10.0))
    }

    fn para(tag: char, px: usize) -> String {
        std::iter::repeat(tag).take(px / 10).collect()
    }

    #[test]
    fn test_create_editor() {
        let editor = editor();
        assert_eq!(editor.page_count(), 1);
        assert!(editor.pages()[0].is_blank());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_import_text() {
        let mut editor = editor();
        let text = [para('a', 200), para('b', 200), para('c', 200)].join("\n\n");
        assert_eq!(editor.import_text(&text).unwrap(), 2);
        assert_eq!(editor.document().text(), text);
    }

    #[test]
    fn test_import_empty_reports_error() {
        let sink = RecordingStatusSink::new();
        let mut editor = editor().with_status_sink(sink.clone());
        assert!(matches!(editor.import_text("  \n\n "), Err(Error::EmptyDocument)));
        assert_eq!(sink.last().map(|(level, _)| level), Some(StatusLevel::Error));
        assert_eq!(editor.page_count(), 1);
    }

    #[test]
    fn test_edit_is_debounced() {
        let mut editor = editor();
        editor.import_text(&para('a', 100)).unwrap();

        let long = [para('a', 300), para('b', 300), para('c', 300)].join("\n\n");
        editor.edit_page(0, &long, 1_000).unwrap();
        assert_eq!(editor.page_count(), 1);
        assert_eq!(editor.pending_reflow(), Some(0));

        assert!(editor.tick(1_200).unwrap().is_none());
        let report = editor.tick(1_500).unwrap().unwrap();
        assert_eq!(report.pages_created, 2);
        assert_eq!(editor.page_count(), 3);
        assert_eq!(editor.pending_reflow(), None);
    }

    #[test]
    fn test_shrinking_edit_pulls_back() {
        let mut editor = editor();
        let text = [para('a', 200), para('b', 200), para('c', 200)].join("\n\n");
        editor.import_text(&text).unwrap();
        assert_eq!(editor.pages()[1].content(), para('c', 200));

        editor.edit_page(0, &para('a', 200), 0).unwrap();
        assert_eq!(
            editor.pages()[0].content(),
            [para('a', 200), para('c', 200)].join("\n\n")
        );
        assert!(editor.pages()[1].is_blank());
    }

    #[test]
    fn test_undo_restores_pages() {
        let mut editor = editor();
        editor
            .import_text("First paragraph.\n\nSecond paragraph.")
            .unwrap();
        editor.move_last_paragraph_to_next(0).unwrap();
        assert_eq!(editor.page_count(), 2);

        assert!(editor.undo());
        assert_eq!(editor.page_count(), 1);
        assert_eq!(
            editor.pages()[0].content(),
            "First paragraph.\n\nSecond paragraph."
        );

        assert!(editor.redo());
        assert_eq!(editor.page_count(), 2);
        assert!(!editor.redo());
    }

    #[test]
    fn test_insufficient_paragraphs_is_warning() {
        let sink = RecordingStatusSink::new();
        let mut editor = editor().with_status_sink(sink.clone());
        editor.import_text("Only one paragraph here.").unwrap();

        assert!(editor.move_last_paragraph_to_next(0).is_err());
        assert_eq!(sink.last().map(|(level, _)| level), Some(StatusLevel::Warning));
    }

    #[test]
    fn test_image_insert_pushes_and_remove_pulls() {
        let mut editor = editor();
        let text = [para('a', 200), para('b', 200)].join("\n\n");
        editor.import_text(&text).unwrap();
        assert_eq!(editor.page_count(), 1);

        let id = editor.insert_image(0, ImageKind::Half).unwrap();
        assert_eq!(editor.page_count(), 2);
        assert_eq!(editor.pages()[1].content(), para('b', 200));

        editor.remove_image(0, &id).unwrap();
        assert_eq!(editor.pages()[0].content(), text);
        assert!(editor.pages()[1].is_blank());
    }

    #[test]
    fn test_declined_delete() {
        let sink = RecordingStatusSink::new();
        let mut editor = editor()
            .with_status_sink(sink.clone())
            .with_confirmation(|_: &str| false);
        editor.import_text("One.\n\nTwo.").unwrap();
        editor.create_page_after(0).unwrap();

        assert!(matches!(editor.delete_page(1), Err(Error::Cancelled)));
        assert_eq!(editor.page_count(), 2);
        assert_eq!(sink.last().map(|(level, _)| level), Some(StatusLevel::Warning));
    }

    #[test]
    fn test_orphans_and_views() {
        let mut editor = editor();
        editor.import_text("Short.").unwrap();
        assert_eq!(editor.orphan_pages(), vec![0]);

        let views = editor.views().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].status, "Ready");
        assert!(views[0].orphan);

        let mut settings = editor.settings().clone();
        settings.page_management.orphan_control = false;
        editor.set_settings(settings).unwrap();
        assert!(editor.orphan_pages().is_empty());
    }
}
