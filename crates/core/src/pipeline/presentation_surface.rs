use crate::shared::raster_image::RasterImage;

/// The screen the preview controller drives.
///
/// Called only from the control thread. User intents (new photo, slider
/// moves, save) flow the other way as
/// [`ControllerEvent`](crate::pipeline::preview_controller::ControllerEvent)s.
pub trait PresentationSurface: Send {
    /// A newly filtered image is ready to replace the one on screen.
    fn on_filtered_image_ready(&mut self, image: RasterImage);

    /// A save attempt finished. Each outcome gets its own acknowledgement.
    fn on_save_completed(&mut self, success: bool, error_message: Option<String>);
}
