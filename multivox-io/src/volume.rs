//! Binary voxel-dump reading.
//!
//! A voxel dump is a sequence of little-endian `f32` samples: all samples
//! of channel 0 in row-major order over the volume dimensions, then
//! channel 1, and so on. The file carries no header; the caller supplies
//! the volume shape and channel count, and the file length is validated
//! against them.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use rayon::prelude::*;

use multivox_core::ChannelSet;

use crate::error::{Error, Result};

/// Volume dimensions in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeShape {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl VolumeShape {
    #[must_use]
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Number of voxels in the volume.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.x * self.y * self.z
    }
}

/// Reads all channels of a voxel dump into a [`ChannelSet`].
///
/// Channels are extracted in parallel; this is the only parallel path in
/// the repository and it completes before any interactive state exists.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] when the file length does not equal
/// `channels * voxels * 4` bytes, or an [`Error::Io`] from opening or
/// mapping the file.
pub fn read_channels<P: AsRef<Path>>(
    path: P,
    shape: VolumeShape,
    num_channels: usize,
) -> Result<ChannelSet> {
    let path = path.as_ref();
    let file = File::open(path)?;
    // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
    // This is the standard safety contract for memory mapping.
    #[allow(unsafe_code)]
    let mmap = unsafe { Mmap::map(&file)? };

    let voxels = shape.voxel_count();
    let expected = num_channels * voxels * std::mem::size_of::<f32>();
    if mmap.len() != expected {
        return Err(Error::InvalidFormat(format!(
            "{} holds {} bytes, expected {} ({} channels x {} voxels x 4)",
            path.display(),
            mmap.len(),
            expected,
            num_channels,
            voxels
        )));
    }

    let channel_stride = voxels * std::mem::size_of::<f32>();
    let bands: Vec<Vec<f32>> = (0..num_channels)
        .into_par_iter()
        .map(|channel| {
            let start = channel * channel_stride;
            let slice = &mmap[start..start + channel_stride];
            decode_f32_slice(slice)
        })
        .collect();

    log::debug!(
        "read {}: {} channels x {} voxels",
        path.display(),
        num_channels,
        voxels
    );
    Ok(ChannelSet::from_bands(bands)?)
}

/// Decodes a byte slice of little-endian `f32` samples.
///
/// # Panics
///
/// Never panics: `chunks_exact(4)` guarantees each chunk length.
fn decode_f32_slice(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}
