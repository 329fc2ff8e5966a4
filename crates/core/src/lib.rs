pub mod filtering;
pub mod photos;
pub mod pipeline;
pub mod preview;
pub mod scheduling;
pub mod shared;
