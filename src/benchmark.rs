//! Wall-clock probe for timing pipeline stages.

use std::time::{Duration, Instant};

/// Start/stop timer keeping the last measured span.
#[derive(Debug, Clone, Copy, Default)]
pub struct Benchmark {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Benchmark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stops the timer and records the span since `start`.
    ///
    /// Without a matching `start` the previous measurement is kept.
    pub fn stop(&mut self) -> Duration {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
        self.elapsed
    }

    /// Last measured span.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measures_span() {
        let mut bench = Benchmark::new();
        bench.start();
        assert!(bench.is_running());
        std::thread::sleep(Duration::from_millis(5));
        let span = bench.stop();

        assert!(!bench.is_running());
        assert!(span >= Duration::from_millis(5));
        assert_eq!(bench.elapsed(), span);
    }

    #[test]
    fn test_stop_without_start_keeps_previous() {
        let mut bench = Benchmark::new();
        assert_eq!(bench.stop(), Duration::ZERO);
    }
}
