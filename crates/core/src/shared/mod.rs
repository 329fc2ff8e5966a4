pub mod constants;
pub mod error;
pub mod raster_image;
