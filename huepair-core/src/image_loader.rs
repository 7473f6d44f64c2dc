//! Image decoding
//!
//! Decoding goes through the `image` crate; every format it is built with
//! is accepted. A decode failure is the one condition that makes an image
//! impossible to analyze and is reported as [`AnalysisError::ImageLoad`].

use std::path::Path;

use image::{DynamicImage, ImageReader};
use log::debug;

use crate::error::{AnalysisError, Result};

/// Load and decode an image file, guessing the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let reader = reader.with_guessed_format().map_err(|e| {
        AnalysisError::image_load(format!("Failed to read image file: {}", path.display()), e)
    })?;

    let img = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    debug!(
        "decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Decode an image already held in memory.
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::image_load("Failed to decode image data", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_missing_file_is_image_load_error() {
        let result = load_image(Path::new("nonexistent_file.png"));
        assert!(matches!(result, Err(AnalysisError::ImageLoad { .. })));
    }

    #[test]
    fn test_garbage_file_is_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let result = load_image(&path);
        assert!(matches!(result, Err(AnalysisError::ImageLoad { .. })));
    }

    #[test]
    fn test_png_file_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }

    #[test]
    fn test_memory_decode() {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let img = load_image_from_memory(&bytes).unwrap();
        assert_eq!(img.to_rgba8().get_pixel(1, 1), &Rgba([1, 2, 3, 255]));

        assert!(load_image_from_memory(b"nope").is_err());
    }
}
