//! Raster decode and encode with the viewer's coordinate convention.
//!
//! Decoded files are flipped vertically so file row 0 becomes the last
//! internal row: the core keeps row 0 at the bottom, matching the texture
//! orientation of the display sink. Encoding applies the inverse flip, so
//! a decode/encode round trip reproduces the file.
//!
//! 8-bit RGB sources get a fully opaque alpha channel synthesized; 8-bit
//! grayscale (common for distance images) is expanded to RGBA the same
//! way. Deeper or exotic color types are rejected rather than silently
//! requantized.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use multivox_core::{RgbaRaster, PIXEL_CHANNELS};

use crate::error::{Error, Result};

/// Decodes a raster file into the internal bottom-up RGBA layout.
///
/// # Errors
///
/// Returns [`Error::Codec`] when the file cannot be decoded and
/// [`Error::InvalidFormat`] for unsupported color types.
pub fn decode_raster<P: AsRef<Path>>(path: P) -> Result<RgbaRaster> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    let rgba = match decoded {
        DynamicImage::ImageRgba8(img) => img.into_raw(),
        DynamicImage::ImageRgb8(img) => {
            let mut bytes = Vec::with_capacity(width * height * PIXEL_CHANNELS);
            for pixel in img.pixels() {
                bytes.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
            }
            bytes
        }
        DynamicImage::ImageLuma8(img) => {
            let mut bytes = Vec::with_capacity(width * height * PIXEL_CHANNELS);
            for pixel in img.pixels() {
                bytes.extend_from_slice(&[pixel[0], pixel[0], pixel[0], 255]);
            }
            bytes
        }
        other => {
            return Err(Error::InvalidFormat(format!(
                "unsupported color type {:?} in {}",
                other.color(),
                path.display()
            )));
        }
    };

    log::debug!("decoded {}: {width}x{height}", path.display());
    let raster = RgbaRaster::from_raw(width, height, flip_rows(width, &rgba))?;
    Ok(raster)
}

/// Encodes a raster back to disk, restoring the file's top-down row order.
///
/// # Errors
///
/// Returns [`Error::Codec`] when the file cannot be written.
pub fn encode_raster<P: AsRef<Path>>(path: P, raster: &RgbaRaster) -> Result<()> {
    let flipped = flip_rows(raster.width(), raster.as_bytes());
    let buffer = RgbaImage::from_raw(
        u32::try_from(raster.width()).map_err(|_| oversized(raster))?,
        u32::try_from(raster.height()).map_err(|_| oversized(raster))?,
        flipped,
    )
    .ok_or_else(|| oversized(raster))?;
    buffer.save(path.as_ref())?;
    Ok(())
}

fn oversized(raster: &RgbaRaster) -> Error {
    Error::InvalidFormat(format!(
        "raster dimensions {}x{} exceed the encodable range",
        raster.width(),
        raster.height()
    ))
}

/// Reverses the row order of a row-major RGBA byte buffer.
fn flip_rows(width: usize, bytes: &[u8]) -> Vec<u8> {
    let stride = width * PIXEL_CHANNELS;
    if stride == 0 {
        return Vec::new();
    }
    let mut flipped = Vec::with_capacity(bytes.len());
    for row in bytes.chunks_exact(stride).rev() {
        flipped.extend_from_slice(row);
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_rows_reverses_row_order() {
        // Two rows of one pixel each.
        let bytes = [1, 1, 1, 1, 2, 2, 2, 2];
        let flipped = flip_rows(1, &bytes);
        assert_eq!(flipped, vec![2, 2, 2, 2, 1, 1, 1, 1]);
        // Involution.
        assert_eq!(flip_rows(1, &flipped), bytes.to_vec());
    }

    #[test]
    fn test_flip_rows_empty() {
        assert!(flip_rows(0, &[]).is_empty());
    }
}
