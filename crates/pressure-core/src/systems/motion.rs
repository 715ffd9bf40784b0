//! Ambient motion coherence.
//!
//! Population maps onto four coherence bands (unified, natural, varied,
//! chaotic); each motion category drifts toward its band target at a
//! capped rate. When the region is quiet and coherent for long enough,
//! categories settle: large motion dies down toward a residual floor of
//! micro-movement so the scene never freezes completely.

use pressure_events::{MotionCategory, MotionSnapshot};

use crate::config::MotionConfig;

#[derive(Debug, Clone, PartialEq)]
struct CategoryState {
    category: MotionCategory,
    coherence: f64,
    settle_seconds: f64,
}

/// Per-region motion coherence model.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionModel {
    categories: Vec<CategoryState>,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionModel {
    /// Creates a model with every category fully unified.
    pub fn new() -> Self {
        Self {
            categories: MotionCategory::all()
                .iter()
                .map(|c| CategoryState {
                    category: *c,
                    coherence: 1.0,
                    settle_seconds: 0.0,
                })
                .collect(),
        }
    }

    /// Advances all categories one tick.
    ///
    /// `coherence_boost` is the active motion-coherence attraction boost;
    /// it raises the target so nearby overflow keeps a quiet region lively
    /// in a coordinated way rather than a chaotic one.
    pub fn step(
        &mut self,
        population: f64,
        delta_time: f64,
        config: &MotionConfig,
        coherence_boost: f64,
    ) {
        for state in &mut self.categories {
            let sensitivity =
                config.category_sensitivity[MotionConfig::category_index(state.category)];
            let felt = (population * sensitivity).clamp(0.0, 1.0);

            let band = if felt < config.unified_max_pop {
                0
            } else if felt < config.natural_max_pop {
                1
            } else if felt < config.varied_max_pop {
                2
            } else {
                3
            };
            let target = (config.band_targets[band] + coherence_boost).min(1.0);

            let gap = target - state.coherence;
            let step = (gap * (delta_time * config.smoothing_rate).min(1.0))
                .clamp(-config.max_step_per_tick, config.max_step_per_tick);
            state.coherence = (state.coherence + step).clamp(0.0, 1.0);

            // Settling needs sustained quiet and high coherence; any
            // activity restarts the clock
            if population < config.settle_pop_threshold
                && state.coherence > config.settle_coherence_threshold
            {
                state.settle_seconds =
                    (state.settle_seconds + delta_time).min(config.settle_duration_seconds);
            } else {
                state.settle_seconds = 0.0;
            }
        }
    }

    /// Current coherence of one category.
    pub fn coherence(&self, category: MotionCategory) -> f64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.coherence)
            .unwrap_or(1.0)
    }

    /// Builds snapshots for all categories.
    pub fn snapshots(&self, config: &MotionConfig) -> Vec<MotionSnapshot> {
        self.categories
            .iter()
            .map(|state| {
                let settle_progress =
                    (state.settle_seconds / config.settle_duration_seconds).clamp(0.0, 1.0);
                MotionSnapshot {
                    category: state.category,
                    coherence: state.coherence,
                    settle_progress,
                    residual_motion: config.residual_motion_floor
                        + (1.0 - config.residual_motion_floor) * (1.0 - settle_progress),
                }
            })
            .collect()
    }

    /// Restores every category to unified and unsettled.
    pub fn reset(&mut self) {
        for state in &mut self.categories {
            state.coherence = 1.0;
            state.settle_seconds = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.5;

    fn run(model: &mut MotionModel, config: &MotionConfig, population: f64, seconds: f64) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            model.step(population, DT, config, 0.0);
        }
    }

    #[test]
    fn test_crowding_degrades_coherence() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        run(&mut model, &config, 0.9, 120.0);
        let coherence = model.coherence(MotionCategory::Foliage);
        assert!((coherence - config.band_targets[3]).abs() < 0.02);
    }

    #[test]
    fn test_sensitivity_splits_categories() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        // 0.32 felt: particles 0.384 (varied band), water 0.256 (natural)
        run(&mut model, &config, 0.32, 120.0);
        let particles = model.coherence(MotionCategory::Particles);
        let water = model.coherence(MotionCategory::Water);
        assert!(particles < water);
    }

    #[test]
    fn test_empty_region_recovers_unified() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        run(&mut model, &config, 0.9, 120.0);
        run(&mut model, &config, 0.0, 240.0);
        let coherence = model.coherence(MotionCategory::Foliage);
        assert!(coherence > 0.97);
    }

    #[test]
    fn test_settling_requires_sustained_quiet() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        // Quiet from the start: settle progress completes
        run(&mut model, &config, 0.05, config.settle_duration_seconds + 1.0);
        let snap = &model.snapshots(&config)[0];
        assert_eq!(snap.settle_progress, 1.0);
        assert!((snap.residual_motion - config.residual_motion_floor).abs() < 1e-9);
    }

    #[test]
    fn test_activity_restarts_settle_clock() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        run(&mut model, &config, 0.05, config.settle_duration_seconds - 2.0);
        run(&mut model, &config, 0.5, 1.0);
        let snap = &model.snapshots(&config)[0];
        assert_eq!(snap.settle_progress, 0.0);
        assert_eq!(snap.residual_motion, 1.0);
    }

    #[test]
    fn test_coherence_boost_raises_target() {
        let config = MotionConfig::default();
        let mut boosted = MotionModel::new();
        let mut plain = MotionModel::new();

        for _ in 0..240 {
            boosted.step(0.5, DT, &config, 0.3);
            plain.step(0.5, DT, &config, 0.0);
        }
        assert!(
            boosted.coherence(MotionCategory::Foliage) > plain.coherence(MotionCategory::Foliage)
        );
    }

    #[test]
    fn test_per_tick_step_cap() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();

        // One huge tick moves at most the cap
        model.step(1.0, 100.0, &config, 0.0);
        let coherence = model.coherence(MotionCategory::Foliage);
        assert!((coherence - (1.0 - config.max_step_per_tick)).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let config = MotionConfig::default();
        let mut model = MotionModel::new();
        run(&mut model, &config, 0.9, 60.0);

        model.reset();
        assert_eq!(model.coherence(MotionCategory::Cloth), 1.0);
        let snap = &model.snapshots(&config)[0];
        assert_eq!(snap.settle_progress, 0.0);
    }
}
