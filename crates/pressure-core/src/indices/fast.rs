//! Fast (audio-analogue) pressure index.
//!
//! A pure weighted sum of named factor contributions. Discomfort factors
//! ramp in with population; comfort factors fade out. Because every
//! contribution is non-decreasing in population, the net index is monotone
//! non-decreasing — downstream lag and hold logic depends on a single
//! rise/fall direction per time window, so this is an invariant, not a
//! tuning accident.

use crate::config::{IndexConfig, PressureFactor};

/// Computes the fast index from population. Stateless given a factor table.
#[derive(Debug, Clone)]
pub struct FastIndexModel {
    factors: Vec<PressureFactor>,
}

impl FastIndexModel {
    /// Builds a model from the configured factor table.
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            factors: config.factors.clone(),
        }
    }

    /// Computes the fast index for a population ratio in [0, 1].
    ///
    /// Clamped to [-1, 1]. The caller guarantees a finite population; the
    /// coordinator layer rejects NaN before it reaches this point.
    pub fn compute(&self, population: f64) -> f64 {
        let mut sum = 0.0;
        for factor in &self.factors {
            sum += Self::contribution(factor, population);
        }
        sum.clamp(-1.0, 1.0)
    }

    /// One factor's contribution at a population.
    ///
    /// Discomfort (weight > 0): `weight * ramp(population)`.
    /// Comfort (weight < 0): `weight * (1 - ramp(population))`, so the
    /// negative contribution shrinks toward zero as the region fills.
    fn contribution(factor: &PressureFactor, population: f64) -> f64 {
        let ramp = ramp_up(population, factor.ramp_start, factor.ramp_end);
        if factor.weight >= 0.0 {
            factor.weight * ramp
        } else {
            factor.weight * (1.0 - ramp)
        }
    }
}

/// Non-decreasing ramp from 0.0 at `start` to 1.0 at `end`.
fn ramp_up(value: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if value >= end { 1.0 } else { 0.0 };
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}
