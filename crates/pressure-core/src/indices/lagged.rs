//! Lagged (visual-analogue) pressure index.
//!
//! Derives its target from a delayed sample of the fast index, smooths
//! toward it, and freezes entirely while a fast-index spike is in flight.
//! The lag is asymmetric: shorter on the way up than on the way down, so
//! a region empties audibly before it looks recovered. The hold plus the
//! lag is what keeps the two indices from ever peaking together.

use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::jitter;
use crate::sample_buffer::SampleBuffer;

/// Direction the fast index moved over the detection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LagDirection {
    #[default]
    Rising,
    Falling,
}

/// Effective mode of the lagged model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaggedMode {
    /// No meaningful movement; target reached
    #[default]
    Idle,
    /// Converging toward the delayed sample
    Tracking,
    /// Frozen while a spike passes through the fast index
    Holding,
}

/// Per-region lagged index state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedIndexModel {
    buffer: SampleBuffer,
    lagged_index: f64,
    hold_until: Option<f64>,
    direction: LagDirection,
    mode: LaggedMode,
    region_seed: u64,
}

impl LaggedIndexModel {
    /// Creates the model for one region.
    pub fn new(region_id: &str, config: &IndexConfig) -> Self {
        Self {
            buffer: SampleBuffer::new(config.sample_window_seconds),
            lagged_index: 0.0,
            hold_until: None,
            direction: LagDirection::Rising,
            mode: LaggedMode::Idle,
            region_seed: jitter::region_seed(region_id),
        }
    }

    /// Advances the model one tick and returns the new lagged index.
    ///
    /// `now` is simulation seconds after this tick's delta has been
    /// applied; `tick` is the tick index used to seed the target jitter.
    pub fn step(
        &mut self,
        now: f64,
        tick: u64,
        delta_time: f64,
        fast_index: f64,
        config: &IndexConfig,
    ) -> f64 {
        self.buffer.push(now, fast_index);

        let window_delta = self.buffer.delta_over(now, config.spike_window_seconds);
        if window_delta > config.direction_epsilon {
            self.direction = LagDirection::Rising;
        } else if window_delta < -config.direction_epsilon {
            self.direction = LagDirection::Falling;
        }

        // Spike suppression: a sharp fast-index move freezes the lagged
        // index so the two channels never jump together.
        if window_delta.abs() > config.spike_threshold {
            self.hold_until = Some(now + config.hold_duration_seconds);
        }

        if let Some(hold_until) = self.hold_until {
            if now < hold_until {
                self.mode = LaggedMode::Holding;
                return self.lagged_index;
            }
            self.hold_until = None;
        }

        let lag = match self.direction {
            LagDirection::Rising => config.lag_rise_seconds,
            LagDirection::Falling => config.lag_fall_seconds,
        };

        let delayed = self.buffer.value_at(now - lag).unwrap_or(fast_index);
        let offset = jitter::lag_jitter(self.region_seed, tick, config.jitter_magnitude);
        let target = (delayed + offset).clamp(-1.0, 1.0);

        let gap = target - self.lagged_index;
        let step = gap * (delta_time * config.lagged_smoothing_rate).min(1.0);
        self.lagged_index = (self.lagged_index + step).clamp(-1.0, 1.0);

        self.mode = if gap.abs() < 1e-3 && window_delta.abs() <= config.direction_epsilon {
            LaggedMode::Idle
        } else {
            LaggedMode::Tracking
        };

        self.lagged_index
    }

    /// Current lagged index without advancing.
    pub fn value(&self) -> f64 {
        self.lagged_index
    }

    /// Tick-time the current hold expires, if any.
    pub fn hold_until(&self) -> Option<f64> {
        self.hold_until
    }

    /// Current effective mode.
    pub fn mode(&self) -> LaggedMode {
        self.mode
    }

    /// Current detected direction.
    pub fn direction(&self) -> LagDirection {
        self.direction
    }

    /// Reinitializes to defaults, keeping the region seed.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.lagged_index = 0.0;
        self.hold_until = None;
        self.direction = LagDirection::Rising;
        self.mode = LaggedMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.1;

    /// Config with jitter off and near-instant smoothing so the lagged
    /// index pins to the delayed sample exactly.
    fn causal_config() -> IndexConfig {
        IndexConfig {
            jitter_magnitude: 0.0,
            lagged_smoothing_rate: 100.0,
            spike_threshold: 10.0,
            ..IndexConfig::default()
        }
    }

    fn drive<F: Fn(f64) -> f64>(
        model: &mut LaggedIndexModel,
        config: &IndexConfig,
        from: f64,
        to: f64,
        fast: F,
    ) {
        let mut tick = (from / DT).round() as u64;
        let mut now = from;
        while now < to {
            now += DT;
            tick += 1;
            model.step(now, tick, DT, fast(now), config);
        }
    }

    #[test]
    fn test_lag_causality_on_rise() {
        let config = causal_config();
        let mut model = LaggedIndexModel::new("town", &config);

        // Slow ramp: fast rises 0.01 per second, well below spike range
        let fast = |t: f64| (t * 0.01).min(1.0) - 0.5;
        drive(&mut model, &config, 0.0, 60.0, fast);

        // At t=60 the lagged index must match fast at t - lag_rise
        let expected = fast(60.0 - config.lag_rise_seconds);
        assert!(
            (model.value() - expected).abs() < 0.02,
            "lagged {} expected {}",
            model.value(),
            expected
        );
        assert_eq!(model.direction(), LagDirection::Rising);
    }

    #[test]
    fn test_lag_causality_on_fall_uses_longer_window() {
        let config = causal_config();
        let mut model = LaggedIndexModel::new("town", &config);

        // Ramp up, then ramp down slowly
        let fast = |t: f64| {
            if t < 60.0 {
                t * 0.01
            } else {
                0.6 - (t - 60.0) * 0.01
            }
        };
        drive(&mut model, &config, 0.0, 120.0, fast);

        assert_eq!(model.direction(), LagDirection::Falling);
        // Falling uses lag_fall, not lag_rise
        let expected = fast(120.0 - config.lag_fall_seconds);
        assert!(
            (model.value() - expected).abs() < 0.02,
            "lagged {} expected {}",
            model.value(),
            expected
        );
    }

    #[test]
    fn test_spike_freezes_lagged_index() {
        let config = IndexConfig {
            jitter_magnitude: 0.0,
            ..IndexConfig::default()
        };
        let mut model = LaggedIndexModel::new("town", &config);

        // Settle at a low plateau first
        drive(&mut model, &config, 0.0, 30.0, |_| -0.2);
        let before = model.value();

        // Step the fast index by 0.8 in a single tick: a spike
        let mut now = 30.0;
        let mut tick = 300;
        now += DT;
        tick += 1;
        model.step(now, tick, DT, 0.6, &config);
        assert_eq!(model.mode(), LaggedMode::Holding);

        // For the whole hold duration the lagged index must not move
        let hold_end = now + config.hold_duration_seconds;
        while now < hold_end - DT {
            now += DT;
            tick += 1;
            model.step(now, tick, DT, 0.6, &config);
            assert_eq!(
                model.value(),
                before,
                "lagged index moved during hold at t={}",
                now
            );
        }
    }

    #[test]
    fn test_resumes_tracking_after_hold() {
        let config = IndexConfig {
            jitter_magnitude: 0.0,
            ..IndexConfig::default()
        };
        let mut model = LaggedIndexModel::new("town", &config);

        drive(&mut model, &config, 0.0, 30.0, |_| -0.2);
        let frozen = model.value();

        // Spike, then hold window plus spike window passes
        drive(&mut model, &config, 30.0, 40.0, |_| 0.6);
        assert!(model.value() > frozen, "lagged index never resumed");
    }

    #[test]
    fn test_jitter_stays_bounded() {
        let config = IndexConfig {
            jitter_magnitude: 0.1,
            lagged_smoothing_rate: 100.0,
            spike_threshold: 10.0,
            ..IndexConfig::default()
        };
        let mut model = LaggedIndexModel::new("town", &config);
        drive(&mut model, &config, 0.0, 60.0, |_| 0.4);

        // Plateau input: lagged must sit within jitter range of 0.4
        assert!((model.value() - 0.4).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_output_clamped() {
        let config = causal_config();
        let mut model = LaggedIndexModel::new("town", &config);
        drive(&mut model, &config, 0.0, 60.0, |_| 1.0);
        assert!(model.value() <= 1.0);
        drive(&mut model, &config, 60.0, 160.0, |_| -1.0);
        assert!(model.value() >= -1.0);
    }

    #[test]
    fn test_reset() {
        let config = IndexConfig::default();
        let mut model = LaggedIndexModel::new("town", &config);
        drive(&mut model, &config, 0.0, 20.0, |_| 0.8);
        assert!(model.value() != 0.0);

        model.reset();
        assert_eq!(model.value(), 0.0);
        assert_eq!(model.mode(), LaggedMode::Idle);
        assert!(model.hold_until().is_none());
    }
}
