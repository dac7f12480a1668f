//! Image decoding helpers.

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::ClassifierError;
use image::DynamicImage;
use rayon::prelude::*;
use std::path::Path;

/// Decodes an image from raw encoded bytes.
///
/// Format detection is automatic (JPEG, PNG, BMP, and the other formats the
/// decoder supports). Corrupt or unsupported bytes fail here, before any
/// model work happens.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ClassifierError> {
    image::load_from_memory(bytes).map_err(ClassifierError::ImageDecode)
}

/// Reads and decodes an image file.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, ClassifierError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image(&bytes)
}

/// Reads and decodes a batch of image files.
///
/// Decoding runs in parallel once the batch exceeds
/// [`DEFAULT_PARALLEL_THRESHOLD`]; smaller batches stay sequential to avoid
/// the fork-join overhead. The first failure aborts the batch.
pub fn load_images_batch(
    paths: &[impl AsRef<Path> + Sync],
) -> Result<Vec<DynamicImage>, ClassifierError> {
    load_images_batch_with_threshold(paths, DEFAULT_PARALLEL_THRESHOLD)
}

fn load_images_batch_with_threshold(
    paths: &[impl AsRef<Path> + Sync],
    parallel_threshold: usize,
) -> Result<Vec<DynamicImage>, ClassifierError> {
    if paths.len() > parallel_threshold {
        paths.par_iter().map(load_image).collect()
    } else {
        paths.iter().map(load_image).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageFormat::Png,
        )
        .unwrap();
        buf
    }

    #[test]
    fn test_decode_valid_png() {
        let img = decode_image(&png_bytes()).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn test_decode_corrupt_bytes_fails() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(ClassifierError::ImageDecode(_))));
    }

    #[test]
    fn test_decode_empty_bytes_fails() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_image("no_such_image.png");
        assert!(matches!(result, Err(ClassifierError::Io(_))));
    }

    #[test]
    fn test_batch_load_round_trips_both_paths() {
        let dir = std::env::temp_dir().join("fracture_detect_batch_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut paths = Vec::new();
        for i in 0..3 {
            let path = dir.join(format!("img_{}.png", i));
            std::fs::write(&path, png_bytes()).unwrap();
            paths.push(path);
        }

        let sequential = load_images_batch_with_threshold(&paths, 10).unwrap();
        let parallel = load_images_batch_with_threshold(&paths, 0).unwrap();
        assert_eq!(sequential.len(), 3);
        assert_eq!(parallel.len(), 3);
    }
}
