#![allow(clippy::cast_precision_loss)]
use approx::assert_relative_eq;
use multivox_core::{
    ChannelSet, HistogramConfig, JointHistogram, RenderParamSink, RgbaRaster, SegmentTableEntry,
};

/// 1000 samples spread evenly over [0, 10).
fn uniform_channel() -> Vec<f32> {
    (0..1000).map(|i| i as f32 * 10.0 / 1000.0).collect()
}

#[test]
fn test_every_sample_binned_exactly_once() {
    let channels =
        ChannelSet::from_bands(vec![uniform_channel(), uniform_channel()]).unwrap();
    let mut histogram = JointHistogram::default();
    histogram.rebuild(&channels, 0, 1).unwrap();
    assert_relative_eq!(histogram.total_count(), 1000.0);
}

#[test]
fn test_constant_channel_fills_single_row() {
    // Channel A constant at 5.0, channel B uniform in [0, 10): all mass
    // lands in channel A's degenerate bin row.
    let channels =
        ChannelSet::from_bands(vec![vec![5.0; 1000], uniform_channel()]).unwrap();
    let mut histogram = JointHistogram::new(HistogramConfig {
        size: 32,
        ..HistogramConfig::default()
    });
    histogram.rebuild(&channels, 0, 1).unwrap();

    let counts = histogram.counts();
    let row_total: f32 = counts[..32].iter().sum();
    assert_relative_eq!(row_total, 1000.0);
    for &count in &counts[32..] {
        assert_relative_eq!(count, 0.0);
    }

    // Empty bins render as neutral gray.
    for index in 32..histogram.image().pixel_count() {
        assert_eq!(histogram.image().pixel_at(index), [100, 100, 100, 255]);
    }
    // The populated row does not.
    assert_ne!(histogram.image().pixel_at(0), [100, 100, 100, 255]);
}

#[test]
fn test_rebuild_is_wholesale() {
    let channels =
        ChannelSet::from_bands(vec![uniform_channel(), uniform_channel(), vec![5.0; 1000]])
            .unwrap();
    let mut histogram = JointHistogram::default();
    histogram.rebuild(&channels, 0, 1).unwrap();
    histogram.rebuild(&channels, 2, 2).unwrap();
    // No residue from the first build: the degenerate pair maps everything
    // to bin (0, 0).
    assert_relative_eq!(histogram.counts()[0], 1000.0);
    assert_relative_eq!(histogram.total_count(), 1000.0);
}

#[derive(Default)]
struct RecordingSink {
    histogram_uploads: Vec<(usize, usize)>,
}

impl RenderParamSink for RecordingSink {
    fn set_histogram_texture(&mut self, image: &RgbaRaster) {
        self.histogram_uploads.push((image.width(), image.height()));
    }

    fn set_mask_texture(&mut self, _image: &RgbaRaster) {}

    fn set_segment_table(&mut self, _table: &[SegmentTableEntry]) {}
}

#[test]
fn test_publish_uploads_finished_image() {
    let channels =
        ChannelSet::from_bands(vec![uniform_channel(), uniform_channel()]).unwrap();
    let mut histogram = JointHistogram::new(HistogramConfig {
        size: 64,
        ..HistogramConfig::default()
    });
    histogram.rebuild(&channels, 0, 1).unwrap();

    let mut sink = RecordingSink::default();
    histogram.publish(&mut sink);
    assert_eq!(sink.histogram_uploads, vec![(64, 64)]);
}
