use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader as Decoder};

use crate::photos::domain::image_reader::{ImageReader, PickedImage};
use crate::shared::raster_image::RasterImage;

/// Decodes an image file with the `image` crate.
///
/// The EXIF orientation is reported alongside the pixels rather than
/// applied, leaving the caller to decide when to rotate.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<PickedImage, Box<dyn std::error::Error>> {
        let mut decoder = Decoder::open(path)?.with_guessed_format()?.into_decoder()?;
        let orientation = decoder.orientation()?;
        let img = DynamicImage::from_decoder(decoder)?;

        log::info!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            img.width(),
            img.height(),
            orientation
        );

        Ok(PickedImage {
            image: RasterImage::from_rgb_image(img.into_rgb8()),
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::metadata::Orientation;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("test.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_returns_dimensions_and_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let picked = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(picked.image.width(), 100);
        assert_eq!(picked.image.height(), 80);
        assert_eq!(picked.image.pixel(0, 0), [50, 100, 200]);
    }

    #[test]
    fn test_png_without_exif_is_upright() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let picked = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(picked.orientation, Orientation::NoTransforms);
    }

    #[test]
    fn test_rgba_source_is_flattened_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let picked = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(picked.image.data().len(), 4 * 4 * 3);
        assert_eq!(picked.image.pixel(3, 3), [10, 20, 30]);
    }

    #[test]
    fn test_read_nonexistent_returns_error() {
        assert!(ImageFileReader::new()
            .read(Path::new("/nonexistent/test.png"))
            .is_err());
    }

    #[test]
    fn test_read_garbage_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(ImageFileReader::new().read(&path).is_err());
    }
}
