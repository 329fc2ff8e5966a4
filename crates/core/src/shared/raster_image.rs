use image::metadata::Orientation;
use image::{DynamicImage, RgbImage};
use ndarray::{ArrayView3, ArrayViewMut3};

/// Bytes per pixel. Rasters are always packed RGB8.
pub const CHANNELS: usize = 3;

/// A decoded raster: contiguous RGB bytes in row-major order.
///
/// Conversion to and from the `image` crate happens at I/O and resampling
/// boundaries; filters work directly on the byte buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Solid-colour raster, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = rgb.iter().copied().cycle().take(pixels * CHANNELS).collect();
        Self::new(data, width, height)
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        self.clone().into_rgb_image()
    }

    pub fn into_rgb_image(self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data)
            .expect("RasterImage data length must match dimensions")
    }

    /// Returns the raster rotated/flipped so that it displays upright.
    pub fn oriented(self, orientation: Orientation) -> Self {
        if orientation == Orientation::NoTransforms {
            return self;
        }
        let mut img = DynamicImage::ImageRgb8(self.into_rgb_image());
        img.apply_orientation(orientation);
        Self::from_rgb_image(img.into_rgb8())
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("RasterImage data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        let shape = self.shape();
        ArrayViewMut3::from_shape(shape, &mut self.data)
            .expect("RasterImage data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
