//! Bounded time-ordered sample history.
//!
//! Each region keeps one buffer of recent fast-index values so the lagged
//! index can ask for "the value N seconds ago". Samples are append-only
//! with oldest-eviction; the window must cover the longest configured lag.

use std::collections::VecDeque;

/// A single (time, value) sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// Bounded history of one scalar signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    window_seconds: f64,
    samples: VecDeque<Sample>,
}

impl SampleBuffer {
    /// Creates a buffer retaining `window_seconds` of history.
    pub fn new(window_seconds: f64) -> Self {
        Self {
            window_seconds,
            samples: VecDeque::new(),
        }
    }

    /// Appends a sample and evicts anything older than the window.
    ///
    /// Times must be non-decreasing; the caller drives this once per tick.
    pub fn push(&mut self, time: f64, value: f64) {
        self.samples.push_back(Sample { time, value });
        let cutoff = time - self.window_seconds;
        while let Some(front) = self.samples.front() {
            if front.time < cutoff && self.samples.len() > 1 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Returns the sample nearest to `target_time`.
    ///
    /// Clamps to the oldest sample when the buffer does not yet reach back
    /// that far, and to the newest when asked about the future.
    pub fn value_at(&self, target_time: f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let mut best = self.samples.front().copied()?;
        let mut best_dist = (best.time - target_time).abs();
        for sample in self.samples.iter().skip(1) {
            let dist = (sample.time - target_time).abs();
            if dist <= best_dist {
                best = *sample;
                best_dist = dist;
            } else {
                // Samples are time-ordered; distance only grows from here
                break;
            }
        }
        Some(best.value)
    }

    /// Returns the most recent value.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().map(|s| s.value)
    }

    /// Change of the signal over the trailing `window` seconds.
    ///
    /// Returns 0.0 until at least two samples exist.
    pub fn delta_over(&self, now: f64, window: f64) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let newest = match self.samples.back() {
            Some(s) => s.value,
            None => return 0.0,
        };
        match self.value_at(now - window) {
            Some(old) => newest - old,
            None => 0.0,
        }
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples have been pushed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
