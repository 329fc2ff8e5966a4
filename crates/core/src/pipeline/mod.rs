pub mod filter_dispatcher;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod presentation_surface;
pub mod preview_controller;
pub mod save_image_use_case;
