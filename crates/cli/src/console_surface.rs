use std::path::{Path, PathBuf};

use sepia_core::photos::infrastructure::image_file_writer::ImageFileWriter;
use sepia_core::pipeline::presentation_surface::PresentationSurface;
use sepia_core::shared::raster_image::RasterImage;

/// Terminal stand-in for the photo screen.
///
/// Every displayed preview overwrites one image file; save results are
/// printed as one-line acknowledgements.
pub struct ConsoleSurface {
    preview_path: PathBuf,
    writer: ImageFileWriter,
    displayed: usize,
}

impl ConsoleSurface {
    pub fn new(preview_path: impl Into<PathBuf>) -> Self {
        Self {
            preview_path: preview_path.into(),
            writer: ImageFileWriter::new(),
            displayed: 0,
        }
    }

    pub fn preview_path(&self) -> &Path {
        &self.preview_path
    }

    pub fn displayed(&self) -> usize {
        self.displayed
    }
}

impl PresentationSurface for ConsoleSurface {
    fn on_filtered_image_ready(&mut self, image: RasterImage) {
        match self.writer.write(&self.preview_path, &image) {
            Ok(()) => {
                self.displayed += 1;
                log::info!(
                    "Preview {} updated ({}x{})",
                    self.preview_path.display(),
                    image.width(),
                    image.height()
                );
            }
            Err(e) => log::warn!("Could not write preview: {e}"),
        }
    }

    fn on_save_completed(&mut self, success: bool, error_message: Option<String>) {
        if success {
            println!("Saved! Your sepia photo is in the library. [OK]");
        } else {
            let reason = error_message.unwrap_or_else(|| "unknown error".to_string());
            println!("Save failed: {reason} [OK]");
        }
    }
}
