//! multivox-io: Raster codec and voxel-dump reading for multivox.
//!
//! This crate provides the file collaborators of the viewer core: a PNG
//! (or equivalent 8-bit) raster codec honoring the internal bottom-up row
//! convention, and a reader for headerless binary voxel dumps.

mod error;
pub mod raster_codec;
pub mod volume;

pub use error::{Error, Result};
pub use raster_codec::{decode_raster, encode_raster};
pub use volume::{read_channels, VolumeShape};
