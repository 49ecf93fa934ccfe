//! Incremental reflow: push overflow forward, pull content back
//!
//! A pass measures and plans the whole cascade before writing anything, so a
//! measurement failure leaves the document exactly as it was.

use smallvec::SmallVec;

use crate::document::{join_paragraphs, split_blank_lines, Document, PARAGRAPH_SEPARATOR};
use crate::error::Result;
use crate::layout::{LayoutContext, MeasureError, TextMeasurer};
use crate::undo::UndoRecorder;

/// Result of splitting page content at the available height
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverflowSplit {
    /// Leading paragraphs that fit
    pub fitting: Vec<String>,
    /// Trailing paragraphs that did not fit
    pub overflow: Vec<String>,
}

impl OverflowSplit {
    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn fitting_content(&self) -> String {
        join_paragraphs(&self.fitting)
    }

    pub fn overflow_content(&self) -> String {
        join_paragraphs(&self.overflow)
    }
}

/// Keep leading paragraphs while their cumulative height fits `available`.
///
/// Paragraphs are atomic: one that would cross the budget goes to the
/// overflow together with everything after it. The first paragraph is always
/// kept, even when it alone exceeds the budget.
pub fn find_overflow<M: TextMeasurer + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    content: &str,
    available: f32,
) -> std::result::Result<OverflowSplit, MeasureError> {
    let paragraphs = split_blank_lines(content);
    let spacing = ctx.paragraph_spacing();

    let mut used = 0.0;
    let mut keep = 0;
    for paragraph in &paragraphs {
        let height = ctx.paragraph_height(paragraph)?;
        if keep > 0 && used + height > available {
            break;
        }
        keep += 1;
        used += height + spacing;
    }

    Ok(OverflowSplit {
        fitting: paragraphs[..keep].iter().map(|p| p.to_string()).collect(),
        overflow: paragraphs[keep..].iter().map(|p| p.to_string()).collect(),
    })
}

/// Summary of a forward reflow pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflowReport {
    /// Page the pass started from
    pub start: usize,
    /// Another pass was active; nothing was done
    pub skipped: bool,
    /// Pages whose content was rewritten
    pub pages_touched: SmallVec<[usize; 4]>,
    /// Pages appended at the end of the document
    pub pages_created: usize,
    /// Paragraph moves across page boundaries
    pub paragraphs_moved: usize,
}

impl ReflowReport {
    fn new(start: usize) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    fn skipped(start: usize) -> Self {
        Self {
            start,
            skipped: true,
            ..Self::default()
        }
    }

    /// Whether the pass modified the document
    pub fn changed(&self) -> bool {
        !self.pages_touched.is_empty()
    }
}

/// Summary of a pull from the following page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    pub page: usize,
    pub skipped: bool,
    pub paragraphs_pulled: usize,
}

impl PullReport {
    pub fn changed(&self) -> bool {
        self.paragraphs_pulled > 0
    }
}

/// Content writes computed by a pass, applied in one go
#[derive(Debug, Default)]
struct CascadePlan {
    writes: Vec<(usize, String)>,
    paragraphs_moved: usize,
}

impl CascadePlan {
    /// Write every planned page, creating pages past the end as needed
    fn apply(self, document: &mut Document, report: &mut ReflowReport) -> Result<()> {
        for (index, content) in self.writes {
            report.pages_created += document.ensure_page(index);
            document.set_content(index, content)?;
            report.pages_touched.push(index);
        }
        report.paragraphs_moved = self.paragraphs_moved;
        Ok(())
    }
}

/// Runs reflow passes over a document, one at a time
#[derive(Debug, Default)]
pub struct ReflowEngine {
    in_progress: bool,
}

impl ReflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pass is currently running
    pub fn is_reflowing(&self) -> bool {
        self.in_progress
    }

    fn begin(&mut self) -> bool {
        if self.in_progress {
            false
        } else {
            self.in_progress = true;
            true
        }
    }

    /// Fit page `start`, cascading overflow forward across as many pages as
    /// needed.
    ///
    /// A call made while another pass is active returns a skipped report.
    pub fn reflow<M: TextMeasurer + ?Sized>(
        &mut self,
        document: &mut Document,
        ctx: &LayoutContext<'_, M>,
        start: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<ReflowReport> {
        document.check_index(start)?;
        if !self.begin() {
            log::debug!("reflow from page {} skipped: pass in progress", start + 1);
            return Ok(ReflowReport::skipped(start));
        }

        log::debug!("starting flow from page {}", start + 1);
        let result = self.run_reflow(document, ctx, start, recorder);
        self.in_progress = false;

        if let Err(err) = &result {
            log::error!("flow from page {} aborted: {}", start + 1, err);
        }
        result
    }

    fn run_reflow<M: TextMeasurer + ?Sized>(
        &self,
        document: &mut Document,
        ctx: &LayoutContext<'_, M>,
        start: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<ReflowReport> {
        let mut report = ReflowReport::new(start);

        let page = document.page(start)?;
        let available = ctx.available_height(page.images());
        let used = ctx.content_height(page.content())?;
        log::debug!(
            "page {} height check: {:.0}px used, {:.0}px available",
            start + 1,
            used,
            available
        );
        if used <= available {
            return Ok(report);
        }

        let split = find_overflow(ctx, page.content(), available)?;
        if !split.has_overflow() {
            // A single oversized paragraph stays where it is
            return Ok(report);
        }

        let mut plan = CascadePlan::default();
        plan.writes.push((start, split.fitting_content()));
        self.flow_forward(document, ctx, start + 1, split.overflow, &mut plan)?;

        recorder.snapshot("automatic text flow", document.pages());
        plan.apply(document, &mut report)?;

        log::debug!(
            "flow from page {} moved {} paragraphs across {} pages ({} created)",
            start + 1,
            report.paragraphs_moved,
            report.pages_touched.len(),
            report.pages_created
        );
        Ok(report)
    }

    /// Plan placing `overflow` in front of page `index`, recursing while the
    /// combined content still overflows.
    fn flow_forward<M: TextMeasurer + ?Sized>(
        &self,
        document: &Document,
        ctx: &LayoutContext<'_, M>,
        index: usize,
        overflow: Vec<String>,
        plan: &mut CascadePlan,
    ) -> std::result::Result<(), MeasureError> {
        if overflow.is_empty() {
            return Ok(());
        }
        plan.paragraphs_moved += overflow.len();

        // Past the end the page will be created blank
        let (existing, images) = match document.pages().get(index) {
            Some(page) => (page.content(), page.images()),
            None => ("", &[][..]),
        };
        let available = ctx.available_height(images);

        let incoming = join_paragraphs(&overflow);
        let combined = if existing.trim().is_empty() {
            incoming
        } else {
            format!("{}{}{}", incoming, PARAGRAPH_SEPARATOR, existing)
        };

        if ctx.content_height(&combined)? > available {
            let split = find_overflow(ctx, &combined, available)?;
            if split.has_overflow() {
                plan.writes.push((index, split.fitting_content()));
                return self.flow_forward(document, ctx, index + 1, split.overflow, plan);
            }
        }

        plan.writes.push((index, combined));
        Ok(())
    }

    /// Pull leading paragraphs of the next page onto page `index` while they
    /// fit in its free space.
    ///
    /// Nothing happens unless the free space exceeds the pull threshold. Only
    /// one page boundary is crossed per call.
    pub fn pull_forward<M: TextMeasurer + ?Sized>(
        &mut self,
        document: &mut Document,
        ctx: &LayoutContext<'_, M>,
        index: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<PullReport> {
        document.check_index(index)?;
        if !self.begin() {
            return Ok(PullReport {
                page: index,
                skipped: true,
                paragraphs_pulled: 0,
            });
        }

        let result = self.run_pull(document, ctx, index, recorder);
        self.in_progress = false;

        if let Err(err) = &result {
            log::error!("pull into page {} aborted: {}", index + 1, err);
        }
        result
    }

    fn run_pull<M: TextMeasurer + ?Sized>(
        &self,
        document: &mut Document,
        ctx: &LayoutContext<'_, M>,
        index: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<PullReport> {
        let mut report = PullReport {
            page: index,
            ..PullReport::default()
        };

        let next_index = index + 1;
        if next_index >= document.len() {
            return Ok(report);
        }

        let page = &document.pages()[index];
        let next = &document.pages()[next_index];
        if next.is_blank() {
            return Ok(report);
        }

        let available = ctx.available_height(page.images());
        let free = available - ctx.content_height(page.content())?;
        if free <= ctx.settings().tuning.pull_threshold_px {
            return Ok(report);
        }

        let spacing = ctx.paragraph_spacing();
        let current_blank = page.is_blank();
        let candidates = next.paragraphs();

        let mut cost = 0.0;
        let mut take = 0;
        for paragraph in &candidates {
            let joint = if !current_blank || take > 0 { spacing } else { 0.0 };
            let height = ctx.paragraph_height(paragraph)? + joint;
            if cost + height > free {
                break;
            }
            cost += height;
            take += 1;
        }

        if take == 0 {
            return Ok(report);
        }

        let pulled = join_paragraphs(&candidates[..take]);
        let remaining = join_paragraphs(&candidates[take..]);

        recorder.snapshot("pull content from next page", document.pages());
        document.page_mut(index)?.append(&pulled);
        document.set_content(next_index, remaining)?;

        log::debug!(
            "pulled {} paragraphs from page {} into page {}",
            take,
            next_index + 1,
            index + 1
        );
        report.paragraphs_pulled = take;
        Ok(report)
    }
}
