use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::pipeline::filter_dispatcher::{
    failed_completion, run_job, Completion, FilterDispatcher,
};
use crate::scheduling::domain::filter_request::Dispatch;

/// Runs every invocation on its own worker thread.
///
/// Overlapping invocations may finish out of order; the generation carried
/// in each [`Completion`] lets the control thread discard late results.
pub struct ThreadedFilterDispatcher;

impl ThreadedFilterDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThreadedFilterDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDispatcher for ThreadedFilterDispatcher {
    fn dispatch(&self, engine: Arc<dyn FilterEngine>, job: Dispatch, done: Sender<Completion>) {
        let generation = job.generation;
        let failed_tx = done.clone();
        let spawned = thread::Builder::new()
            .name(format!("sepia-filter-{generation}"))
            .spawn(move || {
                let completion = run_job(&*engine, &job);
                // Receiver gone means the controller shut down.
                let _ = done.send(completion);
            });
        if let Err(e) = spawned {
            log::error!("Failed to spawn filter worker: {e}");
            let _ = failed_tx.send(failed_completion(generation, e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::intensity::Intensity;
    use crate::scheduling::domain::filter_request::FilterRequest;
    use crate::shared::error::FilterError;
    use crate::shared::raster_image::RasterImage;
    use std::time::{Duration, Instant};

    struct SlowEngine {
        delay_ms: u64,
    }

    impl FilterEngine for SlowEngine {
        fn apply(
            &self,
            image: &RasterImage,
            _intensity: Intensity,
        ) -> Result<RasterImage, FilterError> {
            thread::sleep(Duration::from_millis(self.delay_ms));
            Ok(image.clone())
        }
    }

    fn job(generation: u64) -> Dispatch {
        Dispatch {
            generation,
            request: FilterRequest::new(
                Arc::new(RasterImage::filled(2, 2, [1, 2, 3])),
                Intensity::FULL,
                Instant::now(),
            ),
            coalesced: 1,
        }
    }

    #[test]
    fn test_completion_delivered_on_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        ThreadedFilterDispatcher::new().dispatch(Arc::new(SlowEngine { delay_ms: 0 }), job(7), tx);

        let completion = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(completion.generation, 7);
        assert_eq!(completion.result.unwrap().pixel(0, 0), [1, 2, 3]);
    }

    struct PanickingEngine;

    impl FilterEngine for PanickingEngine {
        fn apply(&self, _image: &RasterImage, _i: Intensity) -> Result<RasterImage, FilterError> {
            panic!("engine blew up");
        }
    }

    #[test]
    fn test_panicking_worker_still_reports_completion() {
        let (tx, rx) = crossbeam_channel::unbounded();
        ThreadedFilterDispatcher::new().dispatch(Arc::new(PanickingEngine), job(5), tx);

        let completion = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(completion.generation, 5);
        assert!(matches!(completion.result, Err(FilterError::EngineFailure(_))));
    }

    #[test]
    fn test_overlapping_jobs_can_finish_out_of_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let dispatcher = ThreadedFilterDispatcher::new();
        dispatcher.dispatch(Arc::new(SlowEngine { delay_ms: 300 }), job(1), tx.clone());
        dispatcher.dispatch(Arc::new(SlowEngine { delay_ms: 0 }), job(2), tx);

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.generation, 2);
        assert_eq!(second.generation, 1);
    }
}
