use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Resamples a raster by a uniform scale factor in `(0, 1]`.
pub trait Resampler: Send {
    fn resample(&self, image: &RasterImage, scale: f32) -> Result<RasterImage, FilterError>;
}

/// Validates a scale factor and returns the target dimensions for `image`.
///
/// Each side is rounded and never drops below one pixel.
pub fn scaled_dimensions(image: &RasterImage, scale: f32) -> Result<(u32, u32), FilterError> {
    if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
        return Err(FilterError::InvalidParameters(format!(
            "resample scale must be in (0, 1], got {scale}"
        )));
    }
    let w = ((image.width() as f32 * scale).round() as u32).max(1);
    let h = ((image.height() as f32 * scale).round() as u32).max(1);
    Ok((w, h))
}
