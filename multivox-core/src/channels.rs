//! Multi-channel voxel sample storage.
//!
//! A volume with C channels is stored as C dense bands of `f32` samples,
//! one value per voxel per channel. The band layout matches how voxel
//! dumps are written on disk (all samples of channel 0, then channel 1,
//! and so on) and keeps each channel contiguous for the linear scans the
//! histogram performs.

use crate::error::{Error, Result};

/// A read-only collection of C channels x N samples.
///
/// Invariant: every channel holds the same number of samples.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSet {
    bands: Vec<Vec<f32>>,
}

impl ChannelSet {
    /// Creates an empty channel set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a channel set from per-channel sample bands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the bands differ in length.
    pub fn from_bands(bands: Vec<Vec<f32>>) -> Result<Self> {
        if let Some(first) = bands.first() {
            let expected = first.len();
            for (index, band) in bands.iter().enumerate() {
                if band.len() != expected {
                    return Err(Error::Config(format!(
                        "channel {} has {} samples, expected {}",
                        index,
                        band.len(),
                        expected
                    )));
                }
            }
        }
        Ok(Self { bands })
    }

    /// Appends one channel of samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the sample count differs from the
    /// channels already present.
    pub fn push_channel(&mut self, samples: Vec<f32>) -> Result<()> {
        if let Some(first) = self.bands.first() {
            if samples.len() != first.len() {
                return Err(Error::Config(format!(
                    "channel has {} samples, expected {}",
                    samples.len(),
                    first.len()
                )));
            }
        }
        self.bands.push(samples);
        Ok(())
    }

    /// Number of channels.
    #[must_use]
    pub fn num_channels(&self) -> usize {
        self.bands.len()
    }

    /// Number of samples per channel.
    #[must_use]
    pub fn samples_per_channel(&self) -> usize {
        self.bands.first().map_or(0, Vec::len)
    }

    /// Returns true if no channels are loaded or the channels hold no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples_per_channel() == 0
    }

    /// Borrow the samples of one channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelOutOfRange`] for an invalid index.
    pub fn channel(&self, index: usize) -> Result<&[f32]> {
        self.bands
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::ChannelOutOfRange {
                index,
                count: self.bands.len(),
            })
    }

    /// Minimum and maximum sample value of one channel, via a single
    /// linear scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelOutOfRange`] for an invalid index and
    /// [`Error::MissingData`] when the channel holds no samples.
    pub fn value_range(&self, index: usize) -> Result<(f32, f32)> {
        let samples = self.channel(index)?;
        let Some(&first) = samples.first() else {
            return Err(Error::MissingData("channel holds no samples"));
        };
        let mut min = first;
        let mut max = first;
        for &value in samples {
            min = min.min(value);
            max = max.max(value);
        }
        Ok((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bands_enforces_equal_lengths() {
        let result = ChannelSet::from_bands(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(Error::Config(_))));

        let set = ChannelSet::from_bands(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(set.num_channels(), 2);
        assert_eq!(set.samples_per_channel(), 2);
    }

    #[test]
    fn test_push_channel() {
        let mut set = ChannelSet::new();
        assert!(set.is_empty());
        set.push_channel(vec![0.0, 1.0, 2.0]).unwrap();
        assert!(set.push_channel(vec![0.0]).is_err());
        set.push_channel(vec![5.0, 5.0, 5.0]).unwrap();
        assert_eq!(set.num_channels(), 2);
    }

    #[test]
    fn test_value_range() {
        let set = ChannelSet::from_bands(vec![vec![3.0, -1.0, 7.5, 0.0]]).unwrap();
        assert_eq!(set.value_range(0).unwrap(), (-1.0, 7.5));
        assert!(matches!(
            set.value_range(1),
            Err(Error::ChannelOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_value_range_constant_channel() {
        let set = ChannelSet::from_bands(vec![vec![5.0; 10]]).unwrap();
        assert_eq!(set.value_range(0).unwrap(), (5.0, 5.0));
    }
}
