//! 2D joint histogram of two volume channels.
//!
//! `JointHistogram` bins every sample pair of two selected channels into a
//! fixed-size grid and tone-maps the visit counts into an RGBA image for
//! display. The image is rebuilt wholesale on every [`JointHistogram::rebuild`]
//! call; there is no incremental update.

use crate::channels::ChannelSet;
use crate::error::{Error, Result};
use crate::raster::{Rgba, RgbaRaster};
use crate::sink::RenderParamSink;
use crate::util::f32_to_u8;

/// How bin counts are normalized before color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CountScale {
    /// `count / ceiling`.
    #[default]
    Linear,
    /// `ln(count) / ln(ceiling)`.
    Log,
}

/// Configuration for the joint histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramConfig {
    /// Grid resolution per axis (the image is `size` x `size`).
    pub size: usize,
    /// Fixed normalization ceiling for the count-to-color mapping.
    ///
    /// A fixed ceiling keeps typical histograms legible instead of
    /// auto-scaling every frame; counts above it saturate at full red.
    pub count_ceiling: f32,
    /// Count normalization mode.
    pub scale: CountScale,
    /// Color of bins with zero visits.
    pub empty_color: Rgba,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            size: 32,
            count_ceiling: 1000.0,
            scale: CountScale::Linear,
            empty_color: [100, 100, 100, 255],
        }
    }
}

/// A 2D joint-density image over two channels of a [`ChannelSet`].
///
/// The row axis bins the first selected channel, the column axis the
/// second. Counts are kept as `f32` between rebuilds only as scratch
/// state; the RGBA image is the published product.
#[derive(Debug, Clone)]
pub struct JointHistogram {
    config: HistogramConfig,
    counts: Vec<f32>,
    image: RgbaRaster,
    channel_row: usize,
    channel_col: usize,
}

impl JointHistogram {
    /// Creates a histogram with the given configuration. The image starts
    /// blank (all bins empty, fully opaque).
    #[must_use]
    pub fn new(config: HistogramConfig) -> Self {
        let mut histogram = Self {
            config,
            counts: vec![0.0; config.size * config.size],
            image: RgbaRaster::new(config.size, config.size),
            channel_row: 0,
            channel_col: 0,
        };
        histogram.tone_map();
        histogram
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// Row-axis channel index of the last rebuild.
    #[must_use]
    pub fn channel_row(&self) -> usize {
        self.channel_row
    }

    /// Column-axis channel index of the last rebuild.
    #[must_use]
    pub fn channel_col(&self) -> usize {
        self.channel_col
    }

    /// The finished RGBA image, for texture upload. Pure read.
    #[must_use]
    pub fn image(&self) -> &RgbaRaster {
        &self.image
    }

    /// Raw bin counts of the last rebuild, row-major.
    #[must_use]
    pub fn counts(&self) -> &[f32] {
        &self.counts
    }

    /// Sum of all bin counts. Equals the sample count after a successful
    /// rebuild.
    #[must_use]
    pub fn total_count(&self) -> f32 {
        self.counts.iter().sum()
    }

    /// Rebuilds counts and image from two channels of `channels`.
    ///
    /// Every sample pair is mapped to a bin by linear range scaling and
    /// counted exactly once. A constant channel (max == min) places all
    /// samples in bin 0 of that axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on a zero-sized grid,
    /// [`Error::MissingData`] on an empty dataset, and
    /// [`Error::ChannelOutOfRange`] on a bad index. The image is still
    /// reset to a valid blank (all bins empty, fully opaque) on failure.
    pub fn rebuild(
        &mut self,
        channels: &ChannelSet,
        channel_row: usize,
        channel_col: usize,
    ) -> Result<()> {
        self.channel_row = channel_row;
        self.channel_col = channel_col;
        self.counts.fill(0.0);

        let result = self.accumulate(channels, channel_row, channel_col);
        if result.is_err() {
            self.counts.fill(0.0);
        }
        self.tone_map();
        result
    }

    /// Pushes the finished image to the render-parameter sink.
    pub fn publish(&self, sink: &mut dyn RenderParamSink) {
        sink.set_histogram_texture(&self.image);
    }

    fn accumulate(
        &mut self,
        channels: &ChannelSet,
        channel_row: usize,
        channel_col: usize,
    ) -> Result<()> {
        if self.config.size == 0 {
            return Err(Error::Config("histogram size must be non-zero".into()));
        }
        if channels.is_empty() {
            return Err(Error::MissingData("no voxel data loaded"));
        }
        let rows = channels.channel(channel_row)?;
        let cols = channels.channel(channel_col)?;
        let (row_min, row_max) = channels.value_range(channel_row)?;
        let (col_min, col_max) = channels.value_range(channel_col)?;

        let size = self.config.size;
        let row_bin_width = (row_max - row_min) / size_to_f32(size);
        let col_bin_width = (col_max - col_min) / size_to_f32(size);

        log::debug!(
            "histogram rebuild: channels ({channel_row}, {channel_col}), \
             ranges [{row_min}, {row_max}] x [{col_min}, {col_max}]"
        );

        for (&row_value, &col_value) in rows.iter().zip(cols) {
            let row_bin = bin_index(row_value, row_min, row_bin_width, size);
            let col_bin = bin_index(col_value, col_min, col_bin_width, size);
            self.counts[row_bin * size + col_bin] += 1.0;
        }
        Ok(())
    }

    fn tone_map(&mut self) {
        let ceiling = self.config.count_ceiling;
        for (index, &count) in self.counts.iter().enumerate() {
            let pixel = if count > 0.0 {
                let normalized = match self.config.scale {
                    CountScale::Linear => count / ceiling,
                    CountScale::Log => count.ln() / ceiling.ln(),
                };
                let intensity = f32_to_u8(normalized * 255.0);
                [intensity, 0, 255 - intensity, 255]
            } else {
                self.config.empty_color
            };
            self.image.set_pixel_at(index, pixel);
        }
    }
}

impl Default for JointHistogram {
    fn default() -> Self {
        Self::new(HistogramConfig::default())
    }
}

/// Map a sample to a bin index by linear range scaling, clamped into the
/// grid. A zero bin width (constant channel) maps everything to bin 0.
fn bin_index(value: f32, min: f32, bin_width: f32, size: usize) -> usize {
    if bin_width <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bin = ((value - min) / bin_width).floor() as usize;
    bin.min(size - 1)
}

#[allow(clippy::cast_precision_loss)]
fn size_to_f32(size: usize) -> f32 {
    size as f32
}
