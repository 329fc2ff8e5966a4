use std::path::Path;

use crate::shared::raster_image::RasterImage;

/// Encodes a raster to disk, picking the format from the file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(
        &self,
        path: &Path,
        image: &RasterImage,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if image.is_empty() {
            return Err("Cannot encode an empty image".into());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        image.to_rgb_image().save(path)?;
        Ok(())
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &RasterImage::filled(100, 80, [50, 100, 200]))
            .unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &RasterImage::filled(50, 50, [50, 100, 200]))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.png");
        ImageFileWriter::new()
            .write(&path, &RasterImage::filled(4, 4, [0, 0, 0]))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_extension_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknown");
        assert!(ImageFileWriter::new()
            .write(&path, &RasterImage::filled(4, 4, [0, 0, 0]))
            .is_err());
    }

    #[test]
    fn test_empty_image_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        assert!(ImageFileWriter::new()
            .write(&path, &RasterImage::new(Vec::new(), 0, 0))
            .is_err());
    }
}
