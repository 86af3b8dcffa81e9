//! Render-parameter sink seam.
//!
//! The external renderer and the on-screen display both consume opaque
//! RGBA buffers and the per-segment table; this trait is the single
//! boundary the core pushes them through. The core never interprets how
//! a sink uses what it receives.

use crate::raster::{Rgb, RgbaRaster};

/// One row of the exported per-segment table: the segment's color and its
/// alpha modifier, keyed by id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentTableEntry {
    pub color: Rgb,
    pub alpha_modifier: i32,
}

/// Consumer of histogram textures, compositing masks, and segment tables.
pub trait RenderParamSink {
    /// Receives a rebuilt joint-histogram image.
    fn set_histogram_texture(&mut self, image: &RgbaRaster);

    /// Receives the segmentation output raster used as compositing mask.
    fn set_mask_texture(&mut self, image: &RgbaRaster);

    /// Receives the per-segment color/alpha table.
    fn set_segment_table(&mut self, table: &[SegmentTableEntry]);
}
