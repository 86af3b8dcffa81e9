//! Color-coded segmentation mask storage and interactive mutation.
//!
//! `SegmentationMaskStore` owns three parallel rasters:
//!
//! - the *mask* image, the canonical source of segment identity (pixel
//!   color encodes segment membership);
//! - the *output* image, what gets published to the renderer as the
//!   compositing mask; starts as a copy of the mask and diverges through
//!   visibility toggles, alpha composition, and paint strokes;
//! - the *distance* image, an independently loaded raster used only as a
//!   per-pixel alpha source.
//!
//! Loading a mask derives a canonical color-to-segment-id map by scanning
//! every pixel in raster order and assigning dense ids in first-seen
//! order. All region operations are full-image scans; they run at
//! interactive (not per-frame) frequency, so no per-color pixel index is
//! maintained beyond that map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::raster::{Rgb, RgbaRaster};
use crate::sink::{RenderParamSink, SegmentTableEntry};
use crate::util::f32_to_u8;

/// Where [`SegmentationMaskStore::apply_distance_alpha`] takes its
/// per-pixel alpha from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphaSource {
    /// The distance raster's intensity, per pixel.
    #[default]
    Distance,
    /// A forced constant, ignoring the distance raster's values.
    Uniform(u8),
}

/// Default per-segment alpha modifier.
const DEFAULT_ALPHA_MODIFIER: i32 = 1;

/// Owns the mask/output/distance rasters and the color-to-segment map.
#[derive(Debug, Clone, Default)]
pub struct SegmentationMaskStore {
    mask: RgbaRaster,
    output: RgbaRaster,
    distance: RgbaRaster,
    color_ids: HashMap<Rgb, usize>,
    colors: Vec<Rgb>,
    alpha_modifiers: Vec<i32>,
    source_path: Option<PathBuf>,
}

impl SegmentationMaskStore {
    /// Creates an empty store. Operations report
    /// [`Error::MissingData`] until a mask is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a decoded mask raster, discarding all prior state.
    ///
    /// The output image becomes a copy of the mask, the color-to-id map is
    /// rebuilt from the mask pixels, and every segment's alpha modifier is
    /// reset to the default. The previously loaded distance raster is kept;
    /// a stale mismatch is caught by [`Self::apply_distance_alpha`].
    pub fn load_mask(&mut self, raster: RgbaRaster, path: Option<&Path>) {
        self.output = raster.clone();
        self.mask = raster;
        self.source_path = path.map(Path::to_path_buf);
        self.rebuild_color_map();
        log::debug!(
            "mask loaded: {}x{}, {} segments",
            self.mask.width(),
            self.mask.height(),
            self.colors.len()
        );
    }

    /// Installs a decoded distance raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when no mask is loaded and
    /// [`Error::DimensionMismatch`] when the dimensions differ from the
    /// mask; in both cases the existing distance raster is untouched.
    pub fn load_distance(&mut self, raster: RgbaRaster) -> Result<()> {
        if self.mask.is_empty() {
            return Err(Error::MissingData("mask image not loaded"));
        }
        if !raster.same_dimensions(&self.mask) {
            return Err(Error::DimensionMismatch {
                expected_width: self.mask.width(),
                expected_height: self.mask.height(),
                width: raster.width(),
                height: raster.height(),
            });
        }
        self.distance = raster;
        Ok(())
    }

    /// The canonical mask raster.
    #[must_use]
    pub fn mask(&self) -> &RgbaRaster {
        &self.mask
    }

    /// The displayed/rendered output raster.
    #[must_use]
    pub fn output(&self) -> &RgbaRaster {
        &self.output
    }

    /// The distance raster.
    #[must_use]
    pub fn distance(&self) -> &RgbaRaster {
        &self.distance
    }

    /// Path the mask was loaded from, if the caller provided one.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Number of distinct segments found at mask load.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.colors.len()
    }

    /// Segment colors in id order.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Mask color under a pixel, or `None` out of bounds.
    #[must_use]
    pub fn mask_color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        self.mask.pixel(x, y).map(|[r, g, b, _]| [r, g, b])
    }

    /// Output color under a pixel, or `None` out of bounds.
    #[must_use]
    pub fn output_color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        self.output.pixel(x, y).map(|[r, g, b, _]| [r, g, b])
    }

    /// Segment id for an exact color match, `None` if the color was never
    /// observed at load time.
    #[must_use]
    pub fn lookup_segment_id(&self, color: Rgb) -> Option<usize> {
        self.color_ids.get(&color).copied()
    }

    /// Copies the distance raster's intensity (or a forced constant) into
    /// the output raster's alpha channel, per pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when the mask or distance raster is
    /// empty, and [`Error::DimensionMismatch`] when a stale distance
    /// raster no longer matches the mask. The output is untouched on error.
    pub fn apply_distance_alpha(&mut self, source: AlphaSource) -> Result<()> {
        if self.output.is_empty() {
            return Err(Error::MissingData("mask image not loaded"));
        }
        if self.distance.is_empty() {
            return Err(Error::MissingData("distance image not loaded"));
        }
        if !self.distance.same_dimensions(&self.output) {
            return Err(Error::DimensionMismatch {
                expected_width: self.output.width(),
                expected_height: self.output.height(),
                width: self.distance.width(),
                height: self.distance.height(),
            });
        }
        for index in 0..self.output.pixel_count() {
            let alpha = match source {
                AlphaSource::Distance => self.distance.rgb_at(index)[0],
                AlphaSource::Uniform(value) => value,
            };
            self.output.set_alpha_at(index, alpha);
        }
        Ok(())
    }

    /// Sets the output RGB of every pixel whose *mask* color equals `from`,
    /// leaving alpha untouched. Returns the number of pixels changed.
    ///
    /// Visibility toggling drives this with `to = [0, 0, 0]` to hide a
    /// segment and the original color to restore it. Idempotent.
    pub fn set_region_color(&mut self, from: Rgb, to: Rgb) -> usize {
        let mut changed = 0;
        for index in 0..self.mask.pixel_count() {
            if self.mask.rgb_at(index) == from {
                self.output.set_rgb_at(index, to);
                changed += 1;
            }
        }
        changed
    }

    /// Rewrites a segment's color in both the mask and output rasters and
    /// remaps its id entry, so the segment keeps its id under the new
    /// color. Returns the number of pixels changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `from` is not a known segment color.
    pub fn recolor_segment(&mut self, from: Rgb, to: Rgb) -> Result<usize> {
        let Some(id) = self.color_ids.remove(&from) else {
            return Err(Error::Config(format!(
                "({}, {}, {}) is not a segment color",
                from[0], from[1], from[2]
            )));
        };
        if self.color_ids.contains_key(&to) {
            log::warn!(
                "recolor target ({}, {}, {}) collides with an existing segment",
                to[0],
                to[1],
                to[2]
            );
        }
        self.color_ids.insert(to, id);
        self.colors[id] = to;

        let mut changed = 0;
        for index in 0..self.mask.pixel_count() {
            if self.mask.rgb_at(index) == from {
                self.mask.set_rgb_at(index, to);
                self.output.set_rgb_at(index, to);
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Shows only the region whose mask color equals `color`: matching
    /// output pixels get alpha 255, all others alpha 0. Full-image pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when no mask is loaded.
    pub fn focus_color(&mut self, color: Rgb) -> Result<()> {
        if self.mask.is_empty() {
            return Err(Error::MissingData("mask image not loaded"));
        }
        for index in 0..self.mask.pixel_count() {
            let alpha = if self.mask.rgb_at(index) == color { 255 } else { 0 };
            self.output.set_alpha_at(index, alpha);
        }
        Ok(())
    }

    /// Stamps a filled disc of `color` into both the mask and output
    /// rasters, centered at `(cx, cy)`. The disc membership test is
    /// Euclidean; coordinates outside the raster are clamped into range.
    ///
    /// Painted colors are not added to the color-to-id map; the map is
    /// only rebuilt at the next mask load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when no mask is loaded.
    pub fn paint_disc(&mut self, cx: i64, cy: i64, radius: u32, color: Rgb) -> Result<()> {
        if self.mask.is_empty() {
            return Err(Error::MissingData("mask image not loaded"));
        }
        let radius = i64::from(radius);
        let diameter = radius * 2;
        for i in 0..diameter {
            for j in 0..diameter {
                if (i - radius).pow(2) + (j - radius).pow(2) >= radius.pow(2) {
                    continue;
                }
                let x = clamp_coord(cx - radius + i, self.mask.width());
                let y = clamp_coord(cy - radius + j, self.mask.height());
                let index = y * self.mask.width() + x;
                self.mask.set_rgb_at(index, color);
                self.output.set_rgb_at(index, color);
            }
        }
        Ok(())
    }

    /// Sets one output pixel's alpha to `clamp(distance * scale, 0, 255)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when the mask or distance raster is
    /// empty and [`Error::PixelOutOfRange`] for a bad flat index.
    pub fn scale_alpha_for_pixel(&mut self, scale: f32, pixel_index: usize) -> Result<()> {
        if self.output.is_empty() {
            return Err(Error::MissingData("mask image not loaded"));
        }
        if self.distance.is_empty() {
            return Err(Error::MissingData("distance image not loaded"));
        }
        if pixel_index >= self.output.pixel_count() {
            return Err(Error::PixelOutOfRange {
                index: pixel_index,
                count: self.output.pixel_count(),
            });
        }
        let distance = f32::from(self.distance.rgb_at(pixel_index)[0]);
        self.output
            .set_alpha_at(pixel_index, f32_to_u8(distance * scale));
        Ok(())
    }

    /// Per-segment alpha modifier, `None` for an unknown id.
    #[must_use]
    pub fn alpha_modifier(&self, id: usize) -> Option<i32> {
        self.alpha_modifiers.get(id).copied()
    }

    /// Sets one segment's alpha modifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SegmentOutOfRange`] for an unknown id.
    pub fn set_alpha_modifier(&mut self, id: usize, value: i32) -> Result<()> {
        let count = self.alpha_modifiers.len();
        match self.alpha_modifiers.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::SegmentOutOfRange { id, count }),
        }
    }

    /// Produces the per-segment (color, alpha modifier) table in id order,
    /// for the renderer's mask-compositing stage.
    ///
    /// A size divergence between the modifier list and the color map can
    /// only happen if state was mutated outside this store's API; it is
    /// reported as a warning and best-effort data is still returned, with
    /// missing modifiers defaulted.
    #[must_use]
    pub fn export_segment_table(&self) -> Vec<SegmentTableEntry> {
        if self.alpha_modifiers.len() != self.colors.len() {
            log::warn!(
                "segment table inconsistency: {} colors but {} alpha modifiers",
                self.colors.len(),
                self.alpha_modifiers.len()
            );
        }
        self.colors
            .iter()
            .enumerate()
            .map(|(id, &color)| SegmentTableEntry {
                color,
                alpha_modifier: self
                    .alpha_modifiers
                    .get(id)
                    .copied()
                    .unwrap_or(DEFAULT_ALPHA_MODIFIER),
            })
            .collect()
    }

    /// Pushes the output raster and segment table to the render-parameter
    /// sink.
    pub fn publish(&self, sink: &mut dyn RenderParamSink) {
        sink.set_mask_texture(&self.output);
        sink.set_segment_table(&self.export_segment_table());
    }

    fn rebuild_color_map(&mut self) {
        self.color_ids.clear();
        self.colors.clear();
        for index in 0..self.mask.pixel_count() {
            let color = self.mask.rgb_at(index);
            if !self.color_ids.contains_key(&color) {
                self.color_ids.insert(color, self.colors.len());
                self.colors.push(color);
            }
        }
        self.alpha_modifiers = vec![DEFAULT_ALPHA_MODIFIER; self.colors.len()];
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_coord(value: i64, size: usize) -> usize {
    value.clamp(0, size as i64 - 1) as usize
}
