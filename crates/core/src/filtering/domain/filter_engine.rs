use crate::filtering::domain::intensity::Intensity;
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Domain interface for the sepia-tone transform.
///
/// Implementations return a new raster and leave the source untouched, so a
/// single source can be filtered from several worker threads at once.
pub trait FilterEngine: Send + Sync {
    fn apply(&self, image: &RasterImage, intensity: Intensity) -> Result<RasterImage, FilterError>;
}
