use ndarray::Axis;

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::filtering::domain::intensity::Intensity;
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Classic digital sepia colour matrix (rows produce R, G, B).
const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// CPU sepia-tone filter.
///
/// Each pixel is blended between its original colour and the fully toned
/// colour by `intensity`, so `0` is the identity and `1` is full sepia.
pub struct SepiaToneEngine;

impl SepiaToneEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SepiaToneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine for SepiaToneEngine {
    fn apply(&self, image: &RasterImage, intensity: Intensity) -> Result<RasterImage, FilterError> {
        if image.is_empty() {
            return Err(FilterError::EngineFailure(format!(
                "cannot filter a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let mut output = image.clone();
        let t = intensity.value();
        if t == 0.0 {
            return Ok(output);
        }

        for mut px in output.as_ndarray_mut().lanes_mut(Axis(2)) {
            let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
            for (channel, row) in SEPIA_MATRIX.iter().enumerate() {
                let toned = (row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]).min(255.0);
                let blended = rgb[channel] + (toned - rgb[channel]) * t;
                px[channel] = blended.round().clamp(0.0, 255.0) as u8;
            }
        }

        Ok(output)
    }
}
