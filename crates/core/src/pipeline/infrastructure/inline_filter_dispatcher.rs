use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::pipeline::filter_dispatcher::{run_job, Completion, FilterDispatcher};
use crate::scheduling::domain::filter_request::Dispatch;

/// Runs the engine synchronously on the calling thread.
///
/// The completion is queued on `done` before `dispatch` returns, which makes
/// controller behaviour deterministic in tests and one-shot runs.
pub struct InlineFilterDispatcher;

impl InlineFilterDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InlineFilterDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDispatcher for InlineFilterDispatcher {
    fn dispatch(&self, engine: Arc<dyn FilterEngine>, job: Dispatch, done: Sender<Completion>) {
        let _ = done.send(run_job(&*engine, &job));
    }
}
