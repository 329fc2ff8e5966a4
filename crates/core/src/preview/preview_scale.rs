use crate::shared::constants::{MAX_PREVIEW_SCALE, MIN_PREVIEW_SCALE};

/// Scale factor applied to a freshly loaded photo before interactive filtering.
///
/// The photo is shrunk so its width roughly matches the viewport, but never
/// below [`MIN_PREVIEW_SCALE`] and never enlarged.
pub fn preview_scale(viewport_width: u32, image_width: u32) -> f32 {
    if image_width == 0 {
        return MAX_PREVIEW_SCALE;
    }
    let ratio = viewport_width as f32 / image_width as f32;
    ratio.clamp(MIN_PREVIEW_SCALE, MAX_PREVIEW_SCALE)
}
