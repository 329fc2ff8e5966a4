use std::fs;
use std::path::{Path, PathBuf};

use crate::photos::domain::photo_library::{Authorization, PhotoLibrary};
use crate::photos::infrastructure::image_file_writer::ImageFileWriter;
use crate::shared::raster_image::RasterImage;

const FILE_PREFIX: &str = "IMG_";
const FILE_EXTENSION: &str = "png";

/// Photo library backed by a plain directory.
///
/// Access is granted when the directory exists (or can be created) and is
/// writable. Photos are stored as sequentially numbered PNG files.
pub struct DirectoryPhotoLibrary {
    dir: PathBuf,
    writer: ImageFileWriter,
    next_index: u32,
}

impl DirectoryPhotoLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: ImageFileWriter::new(),
            next_index: 1,
        }
    }

    fn next_free_path(&mut self) -> PathBuf {
        loop {
            let candidate = self
                .dir
                .join(format!("{FILE_PREFIX}{:04}.{FILE_EXTENSION}", self.next_index));
            self.next_index += 1;
            if !candidate.exists() {
                return candidate;
            }
        }
    }
}

impl PhotoLibrary for DirectoryPhotoLibrary {
    fn authorize(&mut self) -> Authorization {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("Photo library {} unavailable: {e}", self.dir.display());
            return Authorization::Denied;
        }
        let writable = match fs::metadata(&self.dir) {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(e) => {
                log::warn!("Photo library {} unavailable: {e}", self.dir.display());
                false
            }
        };
        if writable && accepts_writes(&self.dir) {
            Authorization::Authorized
        } else {
            Authorization::Denied
        }
    }

    fn write(&mut self, image: &RasterImage) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.next_free_path();
        self.writer.write(&path, image)?;
        log::info!("Saved photo to {}", path.display());
        Ok(path)
    }

    fn location(&self) -> &Path {
        &self.dir
    }
}

/// Mode bits say nothing about ownership, so actually create a file.
fn accepts_writes(dir: &Path) -> bool {
    match tempfile::NamedTempFile::new_in(dir) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Photo library {} is not writable: {e}", dir.display());
            false
        }
    }
}
