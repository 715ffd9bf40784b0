//! Cross-region attraction broadcast.
//!
//! A region whose pressure climbs past the broadcast threshold leaks
//! "interest" to quiet regions within radius: their wildlife spawns, motion
//! coherence, NPC idle richness, and light quality get a distance-weighted
//! boost. A source that quiets down keeps its signal alive through a short
//! grace period, then the signal decays linearly to zero, so targets wind
//! down instead of snapping off.

use std::collections::BTreeMap;

use pressure_events::{AttractionBoost, BoostCategory};

use crate::config::AttractionConfig;

/// One region's view of the world as a broadcast source or target.
#[derive(Debug, Clone, Copy)]
pub struct RegionSample<'a> {
    pub region_id: &'a str,
    pub position: (f64, f64),
    pub population: f64,
    /// max(fast, lagged) from the region's published snapshot
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Signal {
    strength: f64,
    /// Last time the source was actively over threshold
    last_active: f64,
}

/// Engine-wide attraction state, keyed by source region.
#[derive(Debug, Clone, Default)]
pub struct AttractionBroadcaster {
    signals: BTreeMap<String, Signal>,
}

impl AttractionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates source signals and computes the boosts each target receives.
    ///
    /// Samples come from the previous tick's published snapshots, so one
    /// region's boost never depends on another region's same-tick update.
    pub fn step(
        &mut self,
        now: f64,
        samples: &[RegionSample<'_>],
        config: &AttractionConfig,
    ) -> BTreeMap<String, Vec<AttractionBoost>> {
        for sample in samples {
            if sample.pressure > config.broadcast_threshold {
                let overflow = (sample.pressure - config.broadcast_threshold)
                    / (1.0 - config.broadcast_threshold);
                self.signals.insert(
                    sample.region_id.to_string(),
                    Signal {
                        strength: (overflow * config.strength_scale).clamp(0.0, 1.0),
                        last_active: now,
                    },
                );
            }
        }
        // Drop signals that have fully decayed
        let horizon = config.grace_period_seconds + config.decay_window_seconds;
        self.signals.retain(|_, s| now - s.last_active < horizon);

        let mut boosts: BTreeMap<String, Vec<AttractionBoost>> = BTreeMap::new();
        for target in samples {
            if target.population >= config.low_population_cutoff {
                continue;
            }
            for source in samples {
                if source.region_id == target.region_id {
                    continue;
                }
                let Some(signal) = self.signals.get(source.region_id) else {
                    continue;
                };
                let strength = self.effective_strength(signal, now, config);
                let distance = distance(source.position, target.position);
                if distance > config.radius || strength <= 0.0 {
                    continue;
                }
                let falloff = 1.0 - distance / config.radius;
                for category in BoostCategory::all() {
                    let weight = config.category_weights[AttractionConfig::category_index(*category)];
                    let boost = strength * falloff * weight;
                    if boost > 0.01 {
                        boosts
                            .entry(target.region_id.to_string())
                            .or_default()
                            .push(AttractionBoost {
                                source_region: source.region_id.to_string(),
                                category: *category,
                                strength: boost,
                            });
                    }
                }
            }
        }
        boosts
    }

    /// Signal strength after grace and linear decay.
    fn effective_strength(&self, signal: &Signal, now: f64, config: &AttractionConfig) -> f64 {
        let idle = now - signal.last_active;
        if idle <= config.grace_period_seconds {
            signal.strength
        } else {
            let decay = 1.0 - (idle - config.grace_period_seconds) / config.decay_window_seconds;
            signal.strength * decay.max(0.0)
        }
    }

    /// Number of live source signals.
    pub fn active_sources(&self) -> usize {
        self.signals.len()
    }

    /// Drops the signal for one source region.
    pub fn clear_source(&mut self, region_id: &str) {
        self.signals.remove(region_id);
    }

    /// Drops all signals.
    pub fn clear(&mut self) {
        self.signals.clear();
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}
