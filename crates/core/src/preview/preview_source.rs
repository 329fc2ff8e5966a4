use std::sync::Arc;

use crate::filtering::domain::resampler::Resampler;
use crate::preview::preview_scale::preview_scale;
use crate::shared::constants::MAX_PREVIEW_SCALE;
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// A loaded photo together with its once-resampled preview.
///
/// Interactive filtering runs against `preview`; `full` is only filtered on
/// a final commit or when saving.
#[derive(Clone, Debug)]
pub struct PreviewSource {
    full: Arc<RasterImage>,
    preview: Arc<RasterImage>,
    scale: f32,
}

impl PreviewSource {
    pub fn prepare(
        full: RasterImage,
        viewport_width: u32,
        resampler: &dyn Resampler,
    ) -> Result<Self, FilterError> {
        let scale = preview_scale(viewport_width, full.width());
        let full = Arc::new(full);

        let preview = if scale < MAX_PREVIEW_SCALE {
            let resampled = resampler.resample(&full, scale)?;
            log::debug!(
                "Preview resampled {}x{} -> {}x{} (scale {scale:.3})",
                full.width(),
                full.height(),
                resampled.width(),
                resampled.height()
            );
            Arc::new(resampled)
        } else {
            full.clone()
        };

        Ok(Self {
            full,
            preview,
            scale,
        })
    }

    pub fn full(&self) -> &Arc<RasterImage> {
        &self.full
    }

    pub fn preview(&self) -> &Arc<RasterImage> {
        &self.preview
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
