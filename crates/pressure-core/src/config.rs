//! Configuration for the pressure engine.
//!
//! All tuning parameters load from a TOML file so balancing passes never
//! require recompiling. Every section has full defaults; a partial file
//! overrides only the sections it names.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use pressure_events::{BoostCategory, ComfortLevel, MotionCategory, WearLayer, WildlifeTier};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fast/lagged index coupling
    pub indices: IndexConfig,
    /// Wildlife presence tiers
    pub wildlife: WildlifeConfig,
    /// NPC comfort profiles
    pub npc: NpcConfig,
    /// Environmental wear layers and surfaces
    pub wear: WearConfig,
    /// Motion coherence categories
    pub motion: MotionConfig,
    /// Cross-region attraction broadcast
    pub attraction: AttractionConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Toml)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(toml::de::Error),
}

/// One named contribution to the fast index.
///
/// Discomfort factors carry a positive weight and ramp in as population
/// rises across `[ramp_start, ramp_end]`. Comfort factors carry a negative
/// weight and fade out across the same range, so both kinds keep the net
/// sum monotone non-decreasing in population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureFactor {
    pub name: String,
    /// Signed weight; positive = discomfort, negative = comfort
    pub weight: f64,
    /// Population at which the factor starts ramping
    pub ramp_start: f64,
    /// Population at which the factor is fully ramped
    pub ramp_end: f64,
}

impl PressureFactor {
    pub fn new(name: &str, weight: f64, ramp_start: f64, ramp_end: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            ramp_start,
            ramp_end,
        }
    }
}

/// Fast/lagged index coupling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Named factor table for the fast index
    pub factors: Vec<PressureFactor>,
    /// Exponential rate at which the fast index tracks its target (1/s)
    pub fast_smoothing_rate: f64,
    /// Seconds of fast-index history to retain; must cover the max lag
    pub sample_window_seconds: f64,
    /// Window over which direction and spikes are measured (seconds)
    pub spike_window_seconds: f64,
    /// |delta fast| over the spike window that triggers a hold
    pub spike_threshold: f64,
    /// How long the lagged index freezes after a spike (seconds)
    pub hold_duration_seconds: f64,
    /// Lag applied while the fast index is rising (seconds)
    pub lag_rise_seconds: f64,
    /// Lag applied while the fast index is falling (seconds)
    pub lag_fall_seconds: f64,
    /// Exponential rate at which the lagged index approaches its target (1/s)
    pub lagged_smoothing_rate: f64,
    /// Maximum magnitude of the deterministic lag-target jitter
    pub jitter_magnitude: f64,
    /// Minimum |delta fast| over the spike window to change direction
    pub direction_epsilon: f64,
    /// Phase band edge: below this an index counts as low
    pub low_threshold: f64,
    /// Phase band edge: above this an index counts as high
    pub high_threshold: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            factors: vec![
                PressureFactor::new("open_air", -0.30, 0.0, 0.35),
                PressureFactor::new("birdsong", -0.20, 0.0, 0.30),
                PressureFactor::new("footfall_clatter", 0.25, 0.25, 0.75),
                PressureFactor::new("crowd_din", 0.60, 0.30, 0.85),
                PressureFactor::new("voice_overlap", 0.35, 0.45, 0.95),
            ],
            fast_smoothing_rate: 1.5,
            sample_window_seconds: 30.0,
            spike_window_seconds: 1.5,
            spike_threshold: 0.3,
            hold_duration_seconds: 3.0,
            lag_rise_seconds: 10.0,
            lag_fall_seconds: 15.0,
            lagged_smoothing_rate: 0.35,
            jitter_magnitude: 0.05,
            direction_epsilon: 0.02,
            low_threshold: 0.25,
            high_threshold: 0.5,
        }
    }
}

/// Transition timing for one wildlife tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WildlifeTierParams {
    /// Population above which the tier flees
    pub flee_threshold: f64,
    /// Band below the flee threshold that puts the tier on alert
    pub alert_margin: f64,
    /// Seconds in FLEEING before the region reads as empty
    pub settle_delay_seconds: f64,
    /// Seconds the population must stay calm before leaving ABSENT
    pub return_delay_seconds: f64,
    /// Seconds in CAUTIOUS before full presence resumes
    pub confirm_delay_seconds: f64,
}

impl Default for WildlifeTierParams {
    fn default() -> Self {
        // Matches the wary tier
        Self {
            flee_threshold: 0.50,
            alert_margin: 0.10,
            settle_delay_seconds: 6.0,
            return_delay_seconds: 60.0,
            confirm_delay_seconds: 15.0,
        }
    }
}

/// Wildlife presence configuration.
///
/// Tier thresholds are ordered skittish < wary < bold, which staggers
/// departures naturally: the skittish tier leaves first and returns last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WildlifeConfig {
    pub skittish: WildlifeTierParams,
    pub wary: WildlifeTierParams,
    pub bold: WildlifeTierParams,
    /// Spawn multiplier while PRESENT
    pub present_spawn: f64,
    /// Spawn multiplier while ALERT
    pub alert_spawn: f64,
    /// Spawn multiplier while FLEEING
    pub fleeing_spawn: f64,
    /// Spawn multiplier while CAUTIOUS
    pub cautious_spawn: f64,
}

impl Default for WildlifeConfig {
    fn default() -> Self {
        Self {
            skittish: WildlifeTierParams {
                flee_threshold: 0.30,
                alert_margin: 0.10,
                settle_delay_seconds: 4.0,
                return_delay_seconds: 90.0,
                confirm_delay_seconds: 20.0,
            },
            wary: WildlifeTierParams::default(),
            bold: WildlifeTierParams {
                flee_threshold: 0.70,
                alert_margin: 0.10,
                settle_delay_seconds: 8.0,
                return_delay_seconds: 30.0,
                confirm_delay_seconds: 10.0,
            },
            present_spawn: 1.0,
            alert_spawn: 0.6,
            fleeing_spawn: 0.15,
            cautious_spawn: 0.4,
        }
    }
}

impl WildlifeConfig {
    /// Returns the parameters for a tier.
    pub fn tier(&self, tier: WildlifeTier) -> &WildlifeTierParams {
        match tier {
            WildlifeTier::Skittish => &self.skittish,
            WildlifeTier::Wary => &self.wary,
            WildlifeTier::Bold => &self.bold,
        }
    }
}

/// One NPC behavior profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    /// Multiplier applied to population before the comfort lookup
    pub sensitivity: f64,
    /// Whether this profile may drift to region edges when stressed
    pub can_relocate: bool,
    /// Baseline interaction radius scale for this profile
    pub interaction_radius_modifier: f64,
}

impl NpcProfile {
    pub fn new(name: &str, sensitivity: f64, can_relocate: bool, radius: f64) -> Self {
        Self {
            name: name.to_string(),
            sensitivity,
            can_relocate,
            interaction_radius_modifier: radius,
        }
    }
}

/// NPC comfort configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    pub profiles: Vec<NpcProfile>,
    /// Effective-population edges between the five comfort levels
    pub level_thresholds: [f64; 4],
    /// Idle behavior count per comfort level, relaxed first
    pub idle_variety: [u32; 5],
    /// Interaction radius scale per comfort level, relaxed first
    pub radius_scale: [f64; 5],
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            profiles: vec![
                NpcProfile::new("vendor", 0.8, false, 1.25),
                NpcProfile::new("guard", 0.6, false, 1.5),
                NpcProfile::new("ambient", 1.0, true, 1.0),
                NpcProfile::new("child", 1.3, true, 0.75),
            ],
            level_thresholds: [0.2, 0.4, 0.6, 0.8],
            idle_variety: [12, 9, 6, 4, 2],
            radius_scale: [1.0, 0.95, 0.85, 0.7, 0.5],
        }
    }
}

impl NpcConfig {
    /// Maps an effective population to a comfort level.
    pub fn comfort_level(&self, effective_population: f64) -> ComfortLevel {
        let t = &self.level_thresholds;
        if effective_population < t[0] {
            ComfortLevel::Relaxed
        } else if effective_population < t[1] {
            ComfortLevel::Comfortable
        } else if effective_population < t[2] {
            ComfortLevel::Uneasy
        } else if effective_population < t[3] {
            ComfortLevel::Stressed
        } else {
            ComfortLevel::Overwhelmed
        }
    }

    /// Index of a comfort level into the per-level arrays.
    pub fn level_index(level: ComfortLevel) -> usize {
        match level {
            ComfortLevel::Relaxed => 0,
            ComfortLevel::Comfortable => 1,
            ComfortLevel::Uneasy => 2,
            ComfortLevel::Stressed => 3,
            ComfortLevel::Overwhelmed => 4,
        }
    }
}

/// One surface type tracked by the wear subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceParams {
    pub name: String,
    /// Accumulation multiplier relative to grass
    pub wear_multiplier: f64,
    /// Recovery multiplier relative to grass
    pub recovery_multiplier: f64,
}

impl SurfaceParams {
    pub fn new(name: &str, wear: f64, recovery: f64) -> Self {
        Self {
            name: name.to_string(),
            wear_multiplier: wear,
            recovery_multiplier: recovery,
        }
    }
}

/// Environmental wear configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WearConfig {
    pub surfaces: Vec<SurfaceParams>,
    /// Accumulation per second at full population, per layer
    pub accumulation_rates: [f64; 3],
    /// Recovery per second at zero population, per layer
    pub recovery_rates: [f64; 3],
    /// Population above which wear accumulates
    pub wear_start_threshold: f64,
    /// Population below which wear recovers
    pub recovery_threshold: f64,
    /// Hard cap on how far any layer may move in one tick
    pub max_step_per_tick: f64,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            surfaces: vec![
                SurfaceParams::new("grass", 1.0, 1.0),
                SurfaceParams::new("dirt", 0.8, 0.8),
                SurfaceParams::new("stone", 0.2, 2.0),
                SurfaceParams::new("sand", 1.2, 2.0),
            ],
            // Displacement fastest on both ends, damage slowest
            accumulation_rates: [0.08, 0.02, 0.005],
            recovery_rates: [0.0083, 0.0011, 0.00055],
            wear_start_threshold: 0.25,
            recovery_threshold: 0.20,
            max_step_per_tick: 0.05,
        }
    }
}

impl WearConfig {
    /// Index of a layer into the per-layer rate arrays.
    pub fn layer_index(layer: WearLayer) -> usize {
        match layer {
            WearLayer::Displacement => 0,
            WearLayer::Discoloration => 1,
            WearLayer::Damage => 2,
        }
    }
}

/// Motion coherence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Population below which motion is fully unified
    pub unified_max_pop: f64,
    /// Population below which motion stays natural
    pub natural_max_pop: f64,
    /// Population below which motion is merely varied
    pub varied_max_pop: f64,
    /// Coherence targets per band: unified, natural, varied, chaotic
    pub band_targets: [f64; 4],
    /// Per-category sensitivity multipliers, in `MotionCategory::all()` order
    pub category_sensitivity: [f64; 6],
    /// Exponential rate toward the coherence target (1/s)
    pub smoothing_rate: f64,
    /// Hard cap on per-tick coherence change
    pub max_step_per_tick: f64,
    /// Population below which elements may settle
    pub settle_pop_threshold: f64,
    /// Coherence above which elements may settle
    pub settle_coherence_threshold: f64,
    /// Seconds of calm required for full settling
    pub settle_duration_seconds: f64,
    /// Micro-motion that persists even when fully settled
    pub residual_motion_floor: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            unified_max_pop: 0.15,
            natural_max_pop: 0.35,
            varied_max_pop: 0.60,
            band_targets: [1.0, 0.8, 0.5, 0.2],
            // foliage, cloth, props, water, particles, npc_idle
            category_sensitivity: [1.0, 1.1, 0.9, 0.8, 1.2, 1.0],
            smoothing_rate: 0.25,
            max_step_per_tick: 0.04,
            settle_pop_threshold: 0.15,
            settle_coherence_threshold: 0.75,
            settle_duration_seconds: 20.0,
            residual_motion_floor: 0.08,
        }
    }
}

impl MotionConfig {
    /// Index of a category into the sensitivity array.
    pub fn category_index(category: MotionCategory) -> usize {
        match category {
            MotionCategory::Foliage => 0,
            MotionCategory::Cloth => 1,
            MotionCategory::Props => 2,
            MotionCategory::Water => 3,
            MotionCategory::Particles => 4,
            MotionCategory::NpcIdle => 5,
        }
    }
}

/// Cross-region attraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionConfig {
    /// max(fast, lagged) above which a region broadcasts
    pub broadcast_threshold: f64,
    /// Maximum distance a broadcast reaches (world units)
    pub radius: f64,
    /// Targets above this population receive nothing
    pub low_population_cutoff: f64,
    /// Seconds for a boost to decay to zero once the source stops
    pub decay_window_seconds: f64,
    /// Seconds a lapsed source keeps its signal alive before decay starts
    pub grace_period_seconds: f64,
    /// Overall scale on computed boost strength
    pub strength_scale: f64,
    /// Per-category boost weights, in `BoostCategory::all()` order
    pub category_weights: [f64; 4],
}

impl Default for AttractionConfig {
    fn default() -> Self {
        Self {
            broadcast_threshold: 0.3,
            radius: 800.0,
            low_population_cutoff: 0.25,
            decay_window_seconds: 45.0,
            grace_period_seconds: 5.0,
            strength_scale: 0.8,
            // wildlife_spawn, motion_coherence, npc_idle_richness, light_quality
            category_weights: [1.0, 0.6, 0.8, 0.7],
        }
    }
}

impl AttractionConfig {
    /// Index of a boost category into the weight array.
    pub fn category_index(category: BoostCategory) -> usize {
        match category {
            BoostCategory::WildlifeSpawn => 0,
            BoostCategory::MotionCoherence => 1,
            BoostCategory::NpcIdleRichness => 2,
            BoostCategory::LightQuality => 3,
        }
    }
}
