pub mod preview_scale;
pub mod preview_source;
