//! WASM bindings for the paginator

mod flat_buffer;

pub use flat_buffer::PageStatsBuffer;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::editing::Confirmation;
use crate::layout::{LineBreakMeasurer, MeasureError, TextMeasurer};
use crate::settings::{PageSettings, Preset, Typography};
use crate::status::RecordingStatusSink;
use crate::{BookEditor, Error, ImageKind};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Measures through a JS callback `(text, widthPx, cssFont) => heightPx`,
/// falling back to the built-in line breaker when none is set.
#[derive(Default)]
pub struct BridgeMeasurer {
    callback: Option<Function>,
    fallback: LineBreakMeasurer,
}

impl BridgeMeasurer {
    pub fn with_callback(callback: Function) -> Self {
        Self {
            callback: Some(callback),
            fallback: LineBreakMeasurer::new(),
        }
    }
}

/// CSS `font` shorthand for a typography, e.g. `16px/1.4 Georgia`
fn css_font(typography: &Typography) -> String {
    format!(
        "{}px/{} {}",
        typography.font_size_px(),
        typography.line_height,
        typography.font_family
    )
}

impl TextMeasurer for BridgeMeasurer {
    fn measure(&self, text: &str, width_px: f32, typography: &Typography) -> Result<f32, MeasureError> {
        let Some(callback) = &self.callback else {
            return self.fallback.measure(text, width_px, typography);
        };

        let value = callback
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(text),
                &JsValue::from_f64(width_px as f64),
                &JsValue::from_str(&css_font(typography)),
            )
            .map_err(|e| MeasureError::new(format!("measure callback threw: {:?}", e)))?;

        match value.as_f64() {
            Some(height) if height.is_finite() && height >= 0.0 => {
                Ok((height as f32).max(typography.line_height_px()))
            }
            _ => Err(MeasureError::new(format!(
                "measure callback returned {:?}",
                value
            ))),
        }
    }
}

/// Confirms through a JS callback `(prompt) => boolean`
struct JsConfirmation(Function);

impl Confirmation for JsConfirmation {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.0
            .call1(&JsValue::NULL, &JsValue::from_str(prompt))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed paginator wrapper
#[wasm_bindgen]
pub struct WasmPaginator {
    editor: BookEditor<BridgeMeasurer>,
    status: RecordingStatusSink,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_page_settings(PageSettings::default())
    }

    /// Create a paginator from a named preset ("children", "adult", "picture")
    #[wasm_bindgen(js_name = withPreset)]
    pub fn with_preset(name: &str) -> Result<WasmPaginator, JsValue> {
        let preset = Preset::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown preset: {}", name)))?;
        Ok(Self::with_page_settings(PageSettings::from_preset(preset)))
    }

    /// Create a paginator from settings JSON
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(json: &str) -> Result<WasmPaginator, JsValue> {
        let settings = PageSettings::from_json(json).map_err(to_js)?;
        Ok(Self::with_page_settings(settings))
    }

    /// Measure text through `callback(text, widthPx, cssFont)` from now on
    #[wasm_bindgen(js_name = setMeasurer)]
    pub fn set_measurer(&mut self, callback: Function) -> Result<(), JsValue> {
        self.editor
            .set_measurer(BridgeMeasurer::with_callback(callback))
            .map_err(to_js)
    }

    /// Ask `callback(prompt)` before deleting a page
    #[wasm_bindgen(js_name = setConfirm)]
    pub fn set_confirm(&mut self, callback: Function) {
        self.editor.set_confirmation(JsConfirmation(callback));
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> Result<String, JsValue> {
        self.editor.settings().to_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = PageSettings::from_json(json).map_err(to_js)?;
        self.editor.set_settings(settings).map_err(to_js)
    }

    /// Paginate raw text; returns the page count
    #[wasm_bindgen(js_name = importText)]
    pub fn import_text(&mut self, text: &str) -> Result<usize, JsValue> {
        self.editor.import_text(text).map_err(to_js)
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.editor.page_count()
    }

    #[wasm_bindgen(js_name = getPageContent)]
    pub fn get_page_content(&self, index: usize) -> Result<String, JsValue> {
        self.editor
            .document()
            .page(index)
            .map(|p| p.content().to_string())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.editor.document().text()
    }

    /// Page summaries as JSON
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> Result<String, JsValue> {
        let views = self.editor.views().map_err(to_js)?;
        serde_json::to_string(&views).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Per-page integer statistics (see the flat buffer layout)
    #[wasm_bindgen(js_name = getPageStats)]
    pub fn get_page_stats(&self) -> Result<Vec<u32>, JsValue> {
        Ok(self.stats()?.u32_data)
    }

    /// Per-page heights and ratios (see the flat buffer layout)
    #[wasm_bindgen(js_name = getPageHeights)]
    pub fn get_page_heights(&self) -> Result<Vec<f32>, JsValue> {
        Ok(self.stats()?.f32_data)
    }

    /// Record typed content; reflow waits for `tick`
    #[wasm_bindgen(js_name = editPage)]
    pub fn edit_page(&mut self, index: usize, content: &str, now_ms: f64) -> Result<(), JsValue> {
        self.editor
            .edit_page(index, content, now_ms as u64)
            .map_err(to_js)
    }

    /// Run a due reflow; returns whether one ran
    pub fn tick(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        self.editor
            .tick(now_ms as u64)
            .map(|r| r.is_some())
            .map_err(to_js)
    }

    pub fn flush(&mut self) -> Result<bool, JsValue> {
        self.editor
            .flush_pending()
            .map(|r| r.is_some())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = reflowPage)]
    pub fn reflow_page(&mut self, index: usize) -> Result<(), JsValue> {
        self.editor.reflow_now(index).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = moveLastParagraph)]
    pub fn move_last_paragraph(&mut self, index: usize) -> Result<(), JsValue> {
        self.editor
            .move_last_paragraph_to_next(index)
            .map_err(to_js)
    }

    /// Split at a caret char offset, or near the middle when absent
    #[wasm_bindgen(js_name = splitPage)]
    pub fn split_page(&mut self, index: usize, caret: Option<usize>) -> Result<(), JsValue> {
        self.editor.split_at_cursor(index, caret).map_err(to_js)
    }

    #[wasm_bindgen(js_name = createPageAfter)]
    pub fn create_page_after(&mut self, index: usize) -> Result<(), JsValue> {
        self.editor.create_page_after(index).map_err(to_js)
    }

    #[wasm_bindgen(js_name = deletePage)]
    pub fn delete_page(&mut self, index: usize) -> Result<(), JsValue> {
        self.editor.delete_page(index).map_err(to_js)
    }

    /// Insert a "half" or "full" image placeholder; returns its id
    #[wasm_bindgen(js_name = insertImage)]
    pub fn insert_image(&mut self, index: usize, kind: &str) -> Result<String, JsValue> {
        let kind = ImageKind::from_name(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown image kind: {}", kind)))?;
        self.editor.insert_image(index, kind).map_err(to_js)
    }

    #[wasm_bindgen(js_name = removeImage)]
    pub fn remove_image(&mut self, index: usize, id: &str) -> Result<(), JsValue> {
        self.editor.remove_image(index, id).map_err(to_js)
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Status messages since the last call, as JSON `[[level, message], ...]`
    #[wasm_bindgen(js_name = takeStatus)]
    pub fn take_status(&mut self) -> String {
        let messages = self.status.messages();
        self.status.clear();
        serde_json::to_string(&messages).unwrap_or_else(|_| "[]".to_string())
    }
}

impl WasmPaginator {
    fn with_page_settings(settings: PageSettings) -> Self {
        let status = RecordingStatusSink::new();
        let editor = BookEditor::with_settings(BridgeMeasurer::default(), settings)
            .with_status_sink(status.clone());
        Self { editor, status }
    }

    fn stats(&self) -> Result<PageStatsBuffer, JsValue> {
        let fills = self.editor.page_fills().map_err(to_js)?;
        Ok(PageStatsBuffer::build(
            self.editor.document().version(),
            self.editor.pages(),
            &fills,
            self.editor.settings().page_management.orphan_control,
        ))
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginator_without_callback() {
        let mut paginator = WasmPaginator::new();
        let text = "Chapter 1\n\nIt was a dark and stormy night.\n\nThe end.";
        assert_eq!(paginator.import_text(text).ok(), Some(1));
        assert_eq!(paginator.get_page_count(), 1);
        assert_eq!(paginator.get_text(), text);

        let status = paginator.take_status();
        assert!(status.contains("Processed 1 pages"));
        assert_eq!(paginator.take_status(), "[]");
    }

    #[test]
    fn test_page_stats_header() {
        let mut paginator = WasmPaginator::new();
        paginator.import_text("Alpha.\n\nBeta.").ok();
        let stats = paginator.get_page_stats().ok().unwrap_or_default();
        assert_eq!(stats[0], flat_buffer::MAGIC);
        assert_eq!(stats[3], 1);
    }

    #[test]
    fn test_css_font() {
        assert_eq!(css_font(&Typography::default()), "16px/1.4 Georgia");
    }
}
