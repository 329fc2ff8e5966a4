use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::filtering::domain::intensity::Intensity;
use crate::scheduling::domain::filter_request::{Dispatch, FilterRequest};
use crate::scheduling::domain::schedule_state::{ScheduleState, TimerHandle};
use crate::shared::error::FilterError;
use crate::shared::raster_image::RasterImage;

/// Observable scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    TimerArmed,
    Executing,
}

/// What to do with a finished engine invocation.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// Newest result so far: show it.
    Display(RasterImage),
    /// A newer request was issued after this one; its result is dropped.
    Stale { generation: u64, latest: u64 },
    /// Engine failed; keep whatever is displayed.
    Failed(FilterError),
}

/// Coalesces bursts of filter requests into a bounded rate of engine calls.
///
/// The scheduler never sleeps or spawns anything itself. Callers feed it the
/// current time, poll [`fire_due`](Self::fire_due) when
/// [`next_deadline`](Self::next_deadline) passes, and run the returned
/// [`Dispatch`]es. Parameters are captured at fire time, so only the newest
/// request in a burst ever reaches the engine.
pub struct ThrottledScheduler {
    state: ScheduleState,
    next_token: u64,
    next_generation: u64,
    in_flight: usize,
    coalesced: usize,
}

impl ThrottledScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: ScheduleState::new(min_interval),
            next_token: 0,
            next_generation: 0,
            in_flight: 0,
            coalesced: 0,
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn phase(&self) -> SchedulerPhase {
        if self.state.timer.is_some() {
            SchedulerPhase::TimerArmed
        } else if self.in_flight > 0 {
            SchedulerPhase::Executing
        } else {
            SchedulerPhase::Idle
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.timer.map(|t| t.deadline)
    }

    /// Records a new request.
    ///
    /// With `skip_throttle` the request bypasses the timer: any pending
    /// request is dropped and a dispatch is returned for immediate execution.
    /// Otherwise the timer is rearmed and `None` is returned.
    pub fn request(
        &mut self,
        source: Arc<RasterImage>,
        intensity: Intensity,
        skip_throttle: bool,
        now: Instant,
    ) -> Option<Dispatch> {
        let request = FilterRequest::new(source, intensity, now);

        if skip_throttle {
            if self.state.timer.is_some() {
                log::debug!("Immediate request supersedes pending timer");
            }
            self.cancel_pending();
            self.coalesced = 1;
            return Some(self.start(request, now));
        }

        let delay = self.state.delay_at(now);
        self.state.pending_request = Some(request);
        self.coalesced += 1;
        self.arm(now + delay);
        None
    }

    /// Fires the armed timer if its deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Option<Dispatch> {
        let timer = self.state.timer?;
        if timer.deadline > now {
            return None;
        }
        self.state.timer = None;
        let request = self.state.pending_request.take()?;
        Some(self.start(request, now))
    }

    /// Drops the armed timer and its request without firing.
    pub fn cancel_pending(&mut self) {
        self.state.timer = None;
        self.state.pending_request = None;
        self.coalesced = 0;
    }

    /// Resolves a finished invocation against the newest issued generation.
    ///
    /// Only the most recently dispatched request may reach the screen; any
    /// result that completes after a newer request was issued is stale.
    pub fn accept(
        &mut self,
        generation: u64,
        result: Result<RasterImage, FilterError>,
    ) -> CompletionOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Filter generation {generation} failed, keeping previous image: {e}");
                return CompletionOutcome::Failed(e);
            }
        };

        let latest = self.next_generation;
        if generation != latest {
            log::debug!("Discarding stale generation {generation} (latest {latest})");
            return CompletionOutcome::Stale { generation, latest };
        }
        CompletionOutcome::Display(image)
    }

    fn arm(&mut self, deadline: Instant) {
        self.next_token += 1;
        self.state.timer = Some(TimerHandle {
            deadline,
            token: self.next_token,
        });
    }

    fn start(&mut self, request: FilterRequest, now: Instant) -> Dispatch {
        self.state.last_fire_time = Some(now);
        self.next_generation += 1;
        self.in_flight += 1;
        let coalesced = std::mem::take(&mut self.coalesced);
        log::debug!(
            "Dispatching generation {} at intensity {:.3} ({coalesced} request(s), waited {:?})",
            self.next_generation,
            request.intensity().value(),
            now.saturating_duration_since(request.requested_at())
        );
        Dispatch {
            generation: self.next_generation,
            request,
            coalesced,
        }
    }
}
