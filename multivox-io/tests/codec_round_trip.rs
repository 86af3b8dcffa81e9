use image::{Rgb, RgbImage};
use multivox_core::RgbaRaster;
use multivox_io::{decode_raster, encode_raster};

#[test]
fn test_encode_decode_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.png");

    let mut raster = RgbaRaster::filled(8, 4, [10, 20, 30, 255]);
    raster.set_pixel(0, 0, [200, 0, 0, 255]);
    raster.set_pixel(7, 3, [0, 0, 200, 255]);

    encode_raster(&path, &raster).unwrap();
    let decoded = decode_raster(&path).unwrap();
    assert_eq!(decoded, raster);
}

#[test]
fn test_decode_flips_rows_and_synthesizes_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.png");

    // 2x2 RGB file with a marker in the file's top-left pixel.
    let mut img = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
    img.put_pixel(0, 0, Rgb([200, 0, 0]));
    img.save(&path).unwrap();

    let raster = decode_raster(&path).unwrap();
    assert_eq!(raster.width(), 2);
    assert_eq!(raster.height(), 2);
    // File row 0 becomes the last internal row, and alpha is opaque.
    assert_eq!(raster.pixel(0, 1), Some([200, 0, 0, 255]));
    assert_eq!(raster.pixel(0, 0), Some([10, 20, 30, 255]));
}

#[test]
fn test_decode_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(decode_raster(dir.path().join("nope.png")).is_err());
}
