use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver, Sender};

use crate::filtering::domain::filter_engine::FilterEngine;
use crate::filtering::domain::intensity::Intensity;
use crate::filtering::domain::resampler::Resampler;
use crate::photos::domain::image_reader::PickedImage;
use crate::photos::domain::photo_library::PhotoLibrary;
use crate::pipeline::filter_dispatcher::{Completion, FilterDispatcher};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::presentation_surface::PresentationSurface;
use crate::pipeline::save_image_use_case::SaveImageUseCase;
use crate::preview::preview_source::PreviewSource;
use crate::scheduling::domain::filter_request::Dispatch;
use crate::scheduling::throttled_scheduler::{CompletionOutcome, ThrottledScheduler};
use crate::shared::constants::{DEFAULT_MIN_INTERVAL, DEFAULT_VIEWPORT_WIDTH};

/// Tunables for one preview screen.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewConfig {
    pub min_interval: Duration,
    pub viewport_width: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

/// User intents delivered to the control thread.
#[derive(Debug)]
pub enum ControllerEvent {
    NewSourceImagePicked(PickedImage),
    /// Slider moved; throttled and applied to the preview.
    IntensityChanged(f32),
    /// Slider released; applied immediately at full resolution.
    IntensityCommitted(f32),
    SaveRequested,
    Shutdown,
}

/// Control-thread owner of the scheduler and everything it drives.
///
/// All state is mutated from a single thread; only engine invocations leave
/// it, through the [`FilterDispatcher`], and their results come back as
/// [`Completion`]s on an internal channel.
pub struct PreviewController<S: PresentationSurface> {
    config: PreviewConfig,
    scheduler: ThrottledScheduler,
    source: Option<PreviewSource>,
    intensity: Intensity,
    engine: Arc<dyn FilterEngine>,
    resampler: Box<dyn Resampler>,
    dispatcher: Box<dyn FilterDispatcher>,
    saver: SaveImageUseCase,
    logger: Box<dyn PipelineLogger>,
    surface: S,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
}

impl<S: PresentationSurface> PreviewController<S> {
    pub fn new(
        config: PreviewConfig,
        engine: Arc<dyn FilterEngine>,
        resampler: Box<dyn Resampler>,
        dispatcher: Box<dyn FilterDispatcher>,
        library: Box<dyn PhotoLibrary>,
        logger: Box<dyn PipelineLogger>,
        surface: S,
    ) -> Self {
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        Self {
            scheduler: ThrottledScheduler::new(config.min_interval),
            config,
            source: None,
            intensity: Intensity::default(),
            saver: SaveImageUseCase::new(engine.clone(), library),
            engine,
            resampler,
            dispatcher,
            logger,
            surface,
            completion_tx,
            completion_rx,
        }
    }

    /// Starts from a non-default intensity (e.g. restored from settings).
    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn scheduler(&self) -> &ThrottledScheduler {
        &self.scheduler
    }

    pub fn source(&self) -> Option<&PreviewSource> {
        self.source.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Routes one event. Returns `false` once the controller has shut down.
    pub fn handle_event(&mut self, event: ControllerEvent, now: Instant) -> bool {
        match event {
            ControllerEvent::NewSourceImagePicked(picked) => {
                self.on_new_source_image_picked(picked, now)
            }
            ControllerEvent::IntensityChanged(value) => self.on_intensity_changed(value, now),
            ControllerEvent::IntensityCommitted(value) => self.on_intensity_committed(value, now),
            ControllerEvent::SaveRequested => self.on_save_requested(),
            ControllerEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Replaces the source photo and filters its preview straight away.
    pub fn on_new_source_image_picked(&mut self, picked: PickedImage, now: Instant) {
        let upright = picked.image.oriented(picked.orientation);
        let source = match PreviewSource::prepare(
            upright,
            self.config.viewport_width,
            &*self.resampler,
        ) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("Could not prepare preview, keeping previous photo: {e}");
                return;
            }
        };

        self.logger.info(&format!(
            "New photo {}x{} (preview scale {:.2})",
            source.full().width(),
            source.full().height(),
            source.scale()
        ));
        let preview = source.preview().clone();
        self.source = Some(source);

        if let Some(job) = self.scheduler.request(preview, self.intensity, true, now) {
            self.dispatch(job);
        }
    }

    /// Slider moved: throttled preview update.
    pub fn on_intensity_changed(&mut self, value: f32, now: Instant) {
        let Some(intensity) = self.validate(value) else {
            return;
        };
        self.intensity = intensity;

        if let Some(source) = &self.source {
            let preview = source.preview().clone();
            if let Some(job) = self.scheduler.request(preview, intensity, false, now) {
                self.dispatch(job);
            }
            self.on_timer(now);
        }
    }

    /// Slider released: immediate full-resolution render.
    pub fn on_intensity_committed(&mut self, value: f32, now: Instant) {
        let Some(intensity) = self.validate(value) else {
            return;
        };
        self.intensity = intensity;

        if let Some(source) = &self.source {
            let full = source.full().clone();
            if let Some(job) = self.scheduler.request(full, intensity, true, now) {
                self.dispatch(job);
            }
        }
    }

    pub fn on_save_requested(&mut self) {
        let Some(source) = &self.source else {
            self.surface
                .on_save_completed(false, Some("No photo loaded to save".to_string()));
            return;
        };

        let full = source.full().clone();
        let start = Instant::now();
        let result = self.saver.execute(&full, self.intensity);
        self.logger
            .timing("save", start.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(path) => {
                self.logger
                    .info(&format!("Photo saved to {}", path.display()));
                self.surface.on_save_completed(true, None);
            }
            Err(e) => {
                log::warn!("Save failed: {e}");
                self.surface.on_save_completed(false, Some(e.to_string()));
            }
        }
    }

    /// Fires the throttle timer if it is due.
    pub fn on_timer(&mut self, now: Instant) {
        if let Some(job) = self.scheduler.fire_due(now) {
            self.dispatch(job);
        }
    }

    pub fn on_completion(&mut self, completion: Completion) {
        self.logger
            .timing("filter", completion.elapsed.as_secs_f64() * 1000.0);

        match self.scheduler.accept(completion.generation, completion.result) {
            CompletionOutcome::Display(image) => {
                self.surface.on_filtered_image_ready(image);
                self.logger.displayed();
            }
            CompletionOutcome::Stale { .. } => self.logger.metric("stale_results", 1.0),
            CompletionOutcome::Failed(_) => self.logger.metric("engine_failures", 1.0),
        }
    }

    /// Handles every completion already queued, without blocking.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.on_completion(completion);
        }
    }

    pub fn shutdown(&mut self) {
        self.scheduler.cancel_pending();
        self.logger.summary();
    }

    /// Control loop: waits on user events, engine completions and the
    /// throttle deadline until `Shutdown` or until the event sender is dropped.
    pub fn run(mut self, events: Receiver<ControllerEvent>) -> S {
        let completions = self.completion_rx.clone();
        loop {
            let timer = match self.scheduler.next_deadline() {
                Some(deadline) => crossbeam_channel::at(deadline),
                None => crossbeam_channel::never(),
            };

            select! {
                recv(events) -> msg => {
                    let event = msg.unwrap_or(ControllerEvent::Shutdown);
                    if !self.handle_event(event, Instant::now()) {
                        break;
                    }
                }
                recv(completions) -> msg => {
                    if let Ok(completion) = msg {
                        self.on_completion(completion);
                    }
                }
                recv(timer) -> _ => self.on_timer(Instant::now()),
            }
        }
        self.surface
    }

    fn validate(&self, value: f32) -> Option<Intensity> {
        match Intensity::new(value) {
            Ok(intensity) => Some(intensity),
            Err(e) => {
                log::warn!("Ignoring intensity change: {e}");
                None
            }
        }
    }

    fn dispatch(&mut self, job: Dispatch) {
        self.logger
            .metric("coalesced_requests", job.coalesced as f64);
        self.dispatcher
            .dispatch(self.engine.clone(), job, self.completion_tx.clone());
    }
}

/// Runs the controller's loop on a dedicated thread.
///
/// Returns the event sender and a handle yielding the surface after shutdown.
pub fn spawn<S>(
    controller: PreviewController<S>,
) -> (Sender<ControllerEvent>, thread::JoinHandle<S>)
where
    S: PresentationSurface + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded::<ControllerEvent>();
    let handle = thread::spawn(move || controller.run(rx));
    (tx, handle)
}
