use std::path::Path;

pub use image::metadata::Orientation;

use crate::shared::raster_image::RasterImage;

/// A decoded photo plus the orientation it should be displayed with.
#[derive(Clone, Debug)]
pub struct PickedImage {
    pub image: RasterImage,
    pub orientation: Orientation,
}

/// Loads a photo chosen by the user.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<PickedImage, Box<dyn std::error::Error>>;
}
