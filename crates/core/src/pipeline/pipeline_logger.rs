use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting observer for preview pipeline events.
///
/// Keeps the controller free of any particular output mechanism; the CLI
/// logs through `log`, tests plug in a silent or recording logger.
pub trait PipelineLogger: Send {
    /// A filtered image reached the presentation surface.
    fn displayed(&mut self);

    /// Record how long a named stage took for one invocation.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time count (coalesced requests, stale results).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn displayed(&mut self) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards messages to the `log` crate and aggregates per-stage timings
/// and metrics for a summary when the session ends.
pub struct LogPipelineLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    displayed: usize,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            displayed: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Preview session summary ({} previews displayed, {elapsed_s:.1}s):",
            self.displayed
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:12}: {} runs, avg {avg_ms:6.1}ms  max {max_ms:6.1}ms",
                durations.len()
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            let total: f64 = values.iter().sum();
            let avg = total / values.len().max(1) as f64;
            lines.push(format!("  {name}: total {total:.0}, avg {avg:.1}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn displayed(&mut self) {
        self.displayed += 1;
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        log::debug!("{stage} took {duration_ms:.1}ms");
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.displayed();
        logger.timing("filter", 5.0);
        logger.metric("coalesced_requests", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = LogPipelineLogger::new();
        logger.timing("filter", 20.0);
        logger.timing("filter", 30.0);
        logger.timing("save", 5.0);

        assert_eq!(logger.timings_for("filter").unwrap(), &[20.0, 30.0]);
        assert_eq!(logger.timings_for("save").unwrap(), &[5.0]);
        assert!(logger.timings_for("resample").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = LogPipelineLogger::new();
        logger.metric("coalesced_requests", 3.0);
        logger.metric("coalesced_requests", 4.0);

        let values = logger.metrics_for("coalesced_requests").unwrap();
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        assert_relative_eq!(avg, 3.5);
    }

    #[test]
    fn test_displayed_counts() {
        let mut logger = LogPipelineLogger::new();
        logger.displayed();
        logger.displayed();
        assert_eq!(logger.displayed_count(), 2);
    }

    #[test]
    fn test_summary_includes_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new();
        logger.displayed();
        logger.timing("filter", 20.0);
        logger.timing("filter", 40.0);
        logger.metric("stale_results", 1.0);
        logger.metric("stale_results", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("1 previews displayed"));
        assert!(summary.contains("filter"));
        assert!(summary.contains("avg   30.0ms"));
        assert!(summary.contains("max   40.0ms"));
        assert!(summary.contains("stale_results: total 2, avg 1.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new().summary_string().is_none());
    }
}
