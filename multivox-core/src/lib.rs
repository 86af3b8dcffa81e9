//! multivox-core: Histogram and segmentation-mask types for multi-channel
//! volume viewing.
//!
//! This crate provides the interactive core of a multi-channel volumetric
//! data viewer: the 2D joint histogram over two volume channels, the
//! color-coded segmentation-mask store with its derived segment-id map,
//! and the session state machine that drives both from UI events.
//!
//! All operations are synchronous and run to completion on the calling
//! thread; a store or histogram instance assumes exclusive single-thread
//! ownership. Image decoding and voxel-dump reading live in the
//! `multivox-io` companion crate.

pub mod channels;
pub mod error;
pub mod histogram;
pub mod raster;
pub mod segmentation;
pub mod session;
pub mod sink;
mod util;

pub use channels::ChannelSet;
pub use error::{Error, Result};
pub use histogram::{CountScale, HistogramConfig, JointHistogram};
pub use raster::{Rgb, Rgba, RgbaRaster, PIXEL_CHANNELS};
pub use segmentation::{AlphaSource, SegmentationMaskStore};
pub use session::{BlinkTimer, BrushSettings, InteractionSession, MouseButton};
pub use sink::{RenderParamSink, SegmentTableEntry};
