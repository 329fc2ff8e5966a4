pub mod directory_photo_library;
pub mod image_file_reader;
pub mod image_file_writer;
