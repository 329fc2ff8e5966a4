use std::path::PathBuf;
use std::sync::Arc;

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::filtering::domain::intensity::Intensity;
use crate::photos::domain::photo_library::{Authorization, PhotoLibrary};
use crate::shared::error::SaveError;
use crate::shared::raster_image::RasterImage;

/// Full-resolution save: authorize → filter → write.
pub struct SaveImageUseCase {
    engine: Arc<dyn FilterEngine>,
    library: Box<dyn PhotoLibrary>,
}

impl SaveImageUseCase {
    pub fn new(engine: Arc<dyn FilterEngine>, library: Box<dyn PhotoLibrary>) -> Self {
        Self { engine, library }
    }

    /// Filters `source` at `intensity` and stores it in the library.
    ///
    /// Permission is checked first; a denied library is never written to
    /// and no filtering work is done.
    pub fn execute(
        &mut self,
        source: &RasterImage,
        intensity: Intensity,
    ) -> Result<PathBuf, SaveError> {
        if self.library.authorize() == Authorization::Denied {
            return Err(SaveError::PersistenceDenied {
                location: self.library.location().to_path_buf(),
            });
        }

        let filtered = self.engine.apply(source, intensity)?;

        self.library
            .write(&filtered)
            .map_err(|e| SaveError::PersistenceFailure(e.to_string()))
    }
}
