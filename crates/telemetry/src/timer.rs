use crate::metrics::metrics;
use std::time::{Duration, Instant};

/// Measures one operation into the global registry.
///
/// The duration is recorded exactly once, by [`Timer::stop`] or on drop, so
/// early returns through `?` are still measured.
pub struct Timer {
    name: String,
    started: Instant,
    recorded: bool,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            recorded: false,
        }
    }

    /// Record and return the elapsed time.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        if !self.recorded {
            metrics().record_duration(&self.name, elapsed);
            self.recorded = true;
        }
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_records_once() {
        let timer = Timer::start("telemetry.test.stop");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.stop() >= Duration::from_millis(5));
        assert_eq!(metrics().samples("telemetry.test.stop"), 1);
    }

    #[test]
    fn test_drop_records() {
        {
            let _timer = Timer::start("telemetry.test.drop");
        }
        assert_eq!(metrics().samples("telemetry.test.drop"), 1);
    }
}
