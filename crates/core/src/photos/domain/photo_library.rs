use std::path::{Path, PathBuf};

use crate::shared::raster_image::RasterImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied,
}

/// Destination for saved photos.
///
/// `authorize` is always consulted before `write`; a denied library must
/// never be written to.
pub trait PhotoLibrary: Send {
    fn authorize(&mut self) -> Authorization;

    /// Stores the image and returns where it ended up.
    fn write(&mut self, image: &RasterImage) -> Result<PathBuf, Box<dyn std::error::Error>>;

    /// Human-readable location, used in permission messages.
    fn location(&self) -> &Path;
}
