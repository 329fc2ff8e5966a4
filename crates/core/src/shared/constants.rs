use std::time::Duration;

/// Minimum spacing between two throttled filter executions.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(70);

/// Intensity applied to a freshly loaded photo before the user touches the slider.
pub const DEFAULT_INTENSITY: f32 = 0.5;

/// Preview downscale bounds. Previews never upscale.
pub const MIN_PREVIEW_SCALE: f32 = 0.20;
pub const MAX_PREVIEW_SCALE: f32 = 1.0;

/// Logical width of the display the preview is sized for.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 375;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
