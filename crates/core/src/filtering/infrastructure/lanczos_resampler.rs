use image::imageops::{self, FilterType};

use crate::filtering::domain::resampler::{scaled_dimensions, Resampler};
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Lanczos3 downscaler backed by `image::imageops`.
pub struct LanczosResampler {
    filter: FilterType,
}

impl LanczosResampler {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl Default for LanczosResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler for LanczosResampler {
    fn resample(&self, image: &RasterImage, scale: f32) -> Result<RasterImage, FilterError> {
        if image.is_empty() {
            return Err(FilterError::EngineFailure("cannot resample an empty image".into()));
        }
        let (w, h) = scaled_dimensions(image, scale)?;
        if (w, h) == (image.width(), image.height()) {
            return Ok(image.clone());
        }

        let resized = imageops::resize(&image.to_rgb_image(), w, h, self.filter);
        Ok(RasterImage::from_rgb_image(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downscales_to_rounded_dimensions() {
        let img = RasterImage::filled(1500, 1000, [80, 80, 80]);
        let out = LanczosResampler::new().resample(&img, 0.2).unwrap();
        assert_eq!((out.width(), out.height()), (300, 200));
    }

    #[test]
    fn test_uniform_colour_survives_resampling() {
        let img = RasterImage::filled(64, 48, [50, 100, 200]);
        let out = LanczosResampler::new().resample(&img, 0.5).unwrap();
        for (got, want) in out.pixel(10, 10).iter().zip([50u8, 100, 200]) {
            assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
        }
    }

    #[test]
    fn test_unit_scale_returns_copy() {
        let img = RasterImage::filled(10, 10, [1, 2, 3]);
        let out = LanczosResampler::new().resample(&img, 1.0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let img = RasterImage::filled(10, 10, [1, 2, 3]);
        assert!(matches!(
            LanczosResampler::new().resample(&img, 2.0),
            Err(FilterError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RasterImage::new(Vec::new(), 0, 0);
        assert!(LanczosResampler::new().resample(&img, 0.5).is_err());
    }
}
