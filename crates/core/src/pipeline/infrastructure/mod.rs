pub mod inline_filter_dispatcher;
pub mod threaded_filter_dispatcher;
