pub mod filter_request;
pub mod schedule_state;
