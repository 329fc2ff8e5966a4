pub mod domain;
pub mod throttled_scheduler;
