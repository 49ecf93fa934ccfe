//! Flat buffer protocol for page statistics
//!
//! Page indicators are redrawn after every edit, so their numbers cross the
//! WASM boundary as two typed arrays instead of JSON.
//!
//! ## u32 Buffer Layout:
//! ```text
//! [0]     MAGIC (0x50474653 = "PGFS")
//! [1]     SCHEMA_VERSION
//! [2]     document version (low 32 bits)
//! [3]     page_count
//! [4..]   per-page: [number, character_count, image_count, fill_state, flags]
//!           fill_state: 0=optimal 1=near-full 2=full 3=overflow
//!           flags: bit0=orphan, bit1=has_heading
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-page: [used_height, available_height, ratio]
//! ```

use crate::document::{FillState, Page, PageFill};

/// Magic number for format validation: "PGFS" (PaGe Fill Stats)
pub const MAGIC: u32 = 0x50474653;

pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 4;

/// u32 elements per page
pub const PAGE_STRIDE: usize = 5;

/// f32 elements per page
pub const PAGE_F32_STRIDE: usize = 3;

pub const FLAG_ORPHAN: u32 = 1;
pub const FLAG_HEADING: u32 = 1 << 1;

fn fill_code(state: FillState) -> u32 {
    match state {
        FillState::Optimal => 0,
        FillState::NearFull => 1,
        FillState::Full => 2,
        FillState::Overflow => 3,
    }
}

/// Page statistics packed for transfer
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageStatsBuffer {
    pub u32_data: Vec<u32>,
    pub f32_data: Vec<f32>,
}

impl PageStatsBuffer {
    /// Pack one entry per page; `fills` is parallel to `pages`
    pub fn build(version: u64, pages: &[Page], fills: &[PageFill], orphan_control: bool) -> Self {
        let count = pages.len().min(fills.len());
        let mut u32_data = Vec::with_capacity(HEADER_SIZE + count * PAGE_STRIDE);
        let mut f32_data = Vec::with_capacity(count * PAGE_F32_STRIDE);

        u32_data.extend_from_slice(&[MAGIC, SCHEMA_VERSION, version as u32, count as u32]);

        for (page, fill) in pages.iter().zip(fills) {
            let mut flags = 0;
            if orphan_control && page.is_orphan() {
                flags |= FLAG_ORPHAN;
            }
            if page.has_heading() {
                flags |= FLAG_HEADING;
            }
            u32_data.extend_from_slice(&[
                page.number() as u32,
                page.character_count() as u32,
                page.images().len() as u32,
                fill_code(fill.state),
                flags,
            ]);
            f32_data.extend_from_slice(&[fill.used_height, fill.available_height, fill.ratio]);
        }

        Self { u32_data, f32_data }
    }

    pub fn page_count(&self) -> usize {
        self.u32_data.get(3).copied().unwrap_or(0) as usize
    }
}
