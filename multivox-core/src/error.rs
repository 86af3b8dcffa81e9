//! Error types for multivox-core.

use thiserror::Error;

/// Result type alias for multivox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for multivox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Channel index outside the loaded dataset.
    #[error("channel index {index} out of range for {count} channels")]
    ChannelOutOfRange { index: usize, count: usize },

    /// Raster dimensions do not match the already-loaded mask.
    #[error("raster dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    /// Raw buffer length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Operation requires data that has not been loaded yet.
    #[error("missing prerequisite data: {0}")]
    MissingData(&'static str),

    /// Flat pixel index outside the raster.
    #[error("pixel index {index} out of range for {count} pixels")]
    PixelOutOfRange { index: usize, count: usize },

    /// Segment id outside the color map.
    #[error("segment id {id} out of range for {count} segments")]
    SegmentOutOfRange { id: usize, count: usize },
}
