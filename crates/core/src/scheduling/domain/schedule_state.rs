use std::time::{Duration, Instant};

use crate::scheduling::domain::filter_request::FilterRequest;

/// Identifies one armed timer. A rearm always produces a new token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    pub deadline: Instant,
    pub token: u64,
}

/// Mutable throttle bookkeeping for one presentation surface.
///
/// Holds only the latest pending request and the timer that will fire it;
/// at most one timer is ever armed.
#[derive(Debug)]
pub struct ScheduleState {
    pub pending_request: Option<FilterRequest>,
    /// `None` until the first execution, which is never delayed.
    pub last_fire_time: Option<Instant>,
    pub min_interval: Duration,
    pub timer: Option<TimerHandle>,
}

impl ScheduleState {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            pending_request: None,
            last_fire_time: None,
            min_interval,
            timer: None,
        }
    }

    /// `max(last_fire_time + min_interval - now, 0)`.
    pub fn delay_at(&self, now: Instant) -> Duration {
        match self.last_fire_time {
            Some(last) => (last + self.min_interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_cold_start_has_no_delay() {
        let state = ScheduleState::new(70 * MS);
        assert_eq!(state.delay_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_delay_counts_down_from_last_fire() {
        let t0 = Instant::now();
        let mut state = ScheduleState::new(70 * MS);
        state.last_fire_time = Some(t0);
        assert_eq!(state.delay_at(t0 + 10 * MS), 60 * MS);
        assert_eq!(state.delay_at(t0 + 70 * MS), Duration::ZERO);
        assert_eq!(state.delay_at(t0 + 500 * MS), Duration::ZERO);
    }
}
