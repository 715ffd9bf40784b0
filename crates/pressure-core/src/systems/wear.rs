//! Environmental wear accumulation and recovery.
//!
//! Three layers per surface, ordered by time constant: displacement moves
//! fastest on both ends, damage slowest. Accumulation and recovery use
//! separate population thresholds, leaving a dead band between them where
//! wear holds still — a region hovering at moderate traffic neither
//! degrades further nor heals.

use pressure_events::{SurfaceWearSnapshot, WearLayer};

use crate::config::WearConfig;

#[derive(Debug, Clone, PartialEq)]
struct SurfaceState {
    name: String,
    /// Layer values in `WearLayer::all()` order, each in [0, 1]
    layers: [f64; 3],
}

/// Per-region wear model covering all configured surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct WearModel {
    surfaces: Vec<SurfaceState>,
}

impl WearModel {
    /// Creates a pristine model for the configured surfaces.
    pub fn new(config: &WearConfig) -> Self {
        Self {
            surfaces: config
                .surfaces
                .iter()
                .map(|s| SurfaceState {
                    name: s.name.clone(),
                    layers: [0.0; 3],
                })
                .collect(),
        }
    }

    /// Advances all surfaces one tick.
    pub fn step(&mut self, population: f64, delta_time: f64, config: &WearConfig) {
        for (surface, params) in self.surfaces.iter_mut().zip(&config.surfaces) {
            for (i, value) in surface.layers.iter_mut().enumerate() {
                let delta = if population > config.wear_start_threshold {
                    // Accumulation scales with how far past the threshold
                    // the crowd sits
                    let load = (population - config.wear_start_threshold)
                        / (1.0 - config.wear_start_threshold);
                    config.accumulation_rates[i] * params.wear_multiplier * load * delta_time
                } else if population < config.recovery_threshold {
                    -config.recovery_rates[i] * params.recovery_multiplier * delta_time
                } else {
                    0.0
                };
                let delta = delta.clamp(-config.max_step_per_tick, config.max_step_per_tick);
                *value = (*value + delta).clamp(0.0, 1.0);
            }
        }
    }

    /// Current value of one layer on one surface.
    pub fn layer(&self, surface: &str, layer: WearLayer) -> Option<f64> {
        self.surfaces
            .iter()
            .find(|s| s.name == surface)
            .map(|s| s.layers[WearConfig::layer_index(layer)])
    }

    /// Builds snapshots for all surfaces.
    pub fn snapshots(&self) -> Vec<SurfaceWearSnapshot> {
        self.surfaces
            .iter()
            .map(|s| SurfaceWearSnapshot {
                surface: s.name.clone(),
                displacement: s.layers[0],
                discoloration: s.layers[1],
                damage: s.layers[2],
            })
            .collect()
    }

    /// Restores every surface to pristine.
    pub fn reset(&mut self) {
        for surface in &mut self.surfaces {
            surface.layers = [0.0; 3];
        }
    }
}
