use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::scheduling::domain::filter_request::Dispatch;
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Result of one engine invocation, delivered back to the control thread.
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub result: Result<RasterImage, FilterError>,
    pub elapsed: Duration,
}

/// Decides where filter engine invocations run.
///
/// This is a port. Infrastructure provides concrete implementations (a
/// thread per invocation, or inline on the caller). Either way the outcome
/// is sent on `done`; once dispatched, work cannot be cancelled.
pub trait FilterDispatcher: Send {
    fn dispatch(&self, engine: Arc<dyn FilterEngine>, job: Dispatch, done: Sender<Completion>);
}

/// Runs `job` on `engine` and packages the outcome.
///
/// A panicking engine is reported as an `EngineFailure` so the control
/// thread still hears back about the generation.
pub(crate) fn run_job(engine: &dyn FilterEngine, job: &Dispatch) -> Completion {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        engine.apply(job.request.source(), job.request.intensity())
    }));
    let result = outcome.unwrap_or_else(|_| {
        Err(FilterError::EngineFailure("filter engine panicked".to_string()))
    });
    Completion {
        generation: job.generation,
        result,
        elapsed: start.elapsed(),
    }
}

/// Completion for a job that never reached the engine.
pub(crate) fn failed_completion(generation: u64, reason: impl Into<String>) -> Completion {
    Completion {
        generation,
        result: Err(FilterError::EngineFailure(reason.into())),
        elapsed: Duration::ZERO,
    }
}
