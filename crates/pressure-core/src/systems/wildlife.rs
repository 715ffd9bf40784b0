//! Wildlife presence state machines.
//!
//! Each region runs three independent tier machines (skittish, wary, bold)
//! over the same population signal. Departure is fast and threshold-driven;
//! return is slow and staged: the region must stay calm for the tier's full
//! return delay before a tentative CAUTIOUS re-entry, and any disturbance
//! during the absence resets that clock. This asymmetry is the subsystem's
//! whole point: wildlife remembers crowds long after they leave.

use pressure_events::{WildlifeState, WildlifeTier, WildlifeTierSnapshot};

use crate::config::WildlifeConfig;

#[derive(Debug, Clone, PartialEq)]
struct TierState {
    tier: WildlifeTier,
    state: WildlifeState,
    seconds_in_state: f64,
    /// Continuous calm time while ABSENT; resets on any disturbance
    calm_seconds: f64,
}

impl TierState {
    fn new(tier: WildlifeTier) -> Self {
        Self {
            tier,
            state: WildlifeState::Present,
            seconds_in_state: 0.0,
            calm_seconds: 0.0,
        }
    }

    fn enter(&mut self, state: WildlifeState) {
        self.state = state;
        self.seconds_in_state = 0.0;
        self.calm_seconds = 0.0;
    }
}

/// Per-region wildlife presence model.
#[derive(Debug, Clone, PartialEq)]
pub struct WildlifeModel {
    tiers: Vec<TierState>,
}

impl Default for WildlifeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WildlifeModel {
    /// Creates a model with all tiers fully present.
    pub fn new() -> Self {
        Self {
            tiers: WildlifeTier::all().iter().map(|t| TierState::new(*t)).collect(),
        }
    }

    /// Advances all tier machines one tick.
    pub fn step(&mut self, population: f64, delta_time: f64, config: &WildlifeConfig) {
        for tier in &mut self.tiers {
            let params = config.tier(tier.tier);
            let alert_floor = params.flee_threshold - params.alert_margin;
            tier.seconds_in_state += delta_time;

            match tier.state {
                WildlifeState::Present => {
                    if population > params.flee_threshold {
                        tier.enter(WildlifeState::Fleeing);
                    } else if population > alert_floor {
                        tier.enter(WildlifeState::Alert);
                    }
                }
                WildlifeState::Alert => {
                    if population > params.flee_threshold {
                        tier.enter(WildlifeState::Fleeing);
                    } else if population <= alert_floor {
                        tier.enter(WildlifeState::Present);
                    }
                }
                WildlifeState::Fleeing => {
                    // Departure always completes; a crowd that scatters the
                    // tier empties the region even if it disperses at once
                    if tier.seconds_in_state >= params.settle_delay_seconds {
                        tier.enter(WildlifeState::Absent);
                    }
                }
                WildlifeState::Absent => {
                    if population <= alert_floor {
                        tier.calm_seconds += delta_time;
                    } else {
                        tier.calm_seconds = 0.0;
                    }
                    if tier.calm_seconds >= params.return_delay_seconds {
                        tier.enter(WildlifeState::Cautious);
                    }
                }
                WildlifeState::Cautious => {
                    if population > params.flee_threshold {
                        tier.enter(WildlifeState::Fleeing);
                    } else if population > alert_floor {
                        tier.enter(WildlifeState::Alert);
                    } else if tier.seconds_in_state >= params.confirm_delay_seconds {
                        tier.enter(WildlifeState::Present);
                    }
                }
            }
        }
    }

    /// Current state of one tier.
    pub fn state(&self, tier: WildlifeTier) -> WildlifeState {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.state)
            .unwrap_or_default()
    }

    /// Builds snapshots for all tiers.
    ///
    /// `spawn_boost` is the active wildlife-spawn attraction boost; it lifts
    /// every non-absent tier's multiplier, capped at 1.5.
    pub fn snapshots(&self, config: &WildlifeConfig, spawn_boost: f64) -> Vec<WildlifeTierSnapshot> {
        self.tiers
            .iter()
            .map(|tier| {
                let base = match tier.state {
                    WildlifeState::Present => config.present_spawn,
                    WildlifeState::Alert => config.alert_spawn,
                    WildlifeState::Fleeing => config.fleeing_spawn,
                    WildlifeState::Absent => 0.0,
                    WildlifeState::Cautious => config.cautious_spawn,
                };
                let spawn_multiplier = if tier.state == WildlifeState::Absent {
                    0.0
                } else {
                    (base + spawn_boost).min(1.5)
                };
                WildlifeTierSnapshot {
                    tier: tier.tier,
                    state: tier.state,
                    seconds_in_state: tier.seconds_in_state,
                    spawn_multiplier,
                }
            })
            .collect()
    }

    /// Restores all tiers to full presence.
    pub fn reset(&mut self) {
        for tier in &mut self.tiers {
            *tier = TierState::new(tier.tier);
        }
    }
}
