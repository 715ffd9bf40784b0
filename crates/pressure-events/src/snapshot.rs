//! Region snapshot types.
//!
//! Serialization structs for per-region engine output. A snapshot captures
//! everything a downstream consumer (transport layer, renderer) needs for
//! one region at one tick. Consumers must treat snapshots as copy-on-read;
//! the engine never mutates a published snapshot.

use serde::{Deserialize, Serialize};

use crate::PressurePhase;

/// Wildlife sensitivity tier.
///
/// Skittish creatures flee at the lowest population and return last;
/// bold creatures tolerate the most and return first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildlifeTier {
    Skittish,
    Wary,
    Bold,
}

impl WildlifeTier {
    /// All tiers, ordered from most to least sensitive.
    pub fn all() -> &'static [WildlifeTier] {
        &[WildlifeTier::Skittish, WildlifeTier::Wary, WildlifeTier::Bold]
    }
}

/// Wildlife presence state for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WildlifeState {
    /// Full presence and activity
    #[default]
    Present,
    /// Population near the flee threshold, reduced activity
    Alert,
    /// Actively leaving the region
    Fleeing,
    /// No presence; the "memory" of recent crowding
    Absent,
    /// Tentative return after the absence dwell has elapsed
    Cautious,
}

/// NPC comfort level derived from effective population.
///
/// Ordered from most to least comfortable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ComfortLevel {
    #[default]
    Relaxed,
    Comfortable,
    Uneasy,
    Stressed,
    Overwhelmed,
}

impl ComfortLevel {
    /// All comfort levels, ordered from most to least comfortable.
    pub fn all() -> &'static [ComfortLevel] {
        &[
            ComfortLevel::Relaxed,
            ComfortLevel::Comfortable,
            ComfortLevel::Uneasy,
            ComfortLevel::Stressed,
            ComfortLevel::Overwhelmed,
        ]
    }
}

/// Environmental wear layer, ordered fastest to slowest time constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WearLayer {
    /// Footprints, trampled grass; builds and fades fastest
    Displacement,
    /// Browning, mud, worn paths
    Discoloration,
    /// Dead patches, compaction; slowest on both ends
    Damage,
}

impl WearLayer {
    /// All layers, fastest time constant first.
    pub fn all() -> &'static [WearLayer] {
        &[WearLayer::Displacement, WearLayer::Discoloration, WearLayer::Damage]
    }
}

/// Category of ambient motion driven by the coherence subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionCategory {
    Foliage,
    Cloth,
    Props,
    Water,
    Particles,
    NpcIdle,
}

impl MotionCategory {
    /// All motion categories.
    pub fn all() -> &'static [MotionCategory] {
        &[
            MotionCategory::Foliage,
            MotionCategory::Cloth,
            MotionCategory::Props,
            MotionCategory::Water,
            MotionCategory::Particles,
            MotionCategory::NpcIdle,
        ]
    }
}

/// Output category an attraction broadcast boosts in a target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostCategory {
    WildlifeSpawn,
    MotionCoherence,
    NpcIdleRichness,
    LightQuality,
}

impl BoostCategory {
    /// All boost categories.
    pub fn all() -> &'static [BoostCategory] {
        &[
            BoostCategory::WildlifeSpawn,
            BoostCategory::MotionCoherence,
            BoostCategory::NpcIdleRichness,
            BoostCategory::LightQuality,
        ]
    }
}

/// Wildlife state for one sensitivity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildlifeTierSnapshot {
    pub tier: WildlifeTier,
    pub state: WildlifeState,
    /// Seconds spent in the current state
    pub seconds_in_state: f64,
    /// Spawn rate multiplier for this tier, 0.0 to 1.0 before boosts
    pub spawn_multiplier: f64,
}

/// Comfort output for one NPC profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcComfortSnapshot {
    /// Profile name, e.g. "vendor"
    pub profile: String,
    pub comfort: ComfortLevel,
    /// Population after the profile's sensitivity multiplier
    pub effective_population: f64,
    /// Number of idle behaviors available at this comfort level
    pub idle_variety: u32,
    /// True when the profile should drift toward region edges
    pub edge_seeking: bool,
    /// Interaction radius scale relative to the profile baseline
    pub interaction_radius_scale: f64,
}

/// Wear layer values for one surface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceWearSnapshot {
    /// Surface name, e.g. "grass"
    pub surface: String,
    pub displacement: f64,
    pub discoloration: f64,
    pub damage: f64,
}

impl SurfaceWearSnapshot {
    /// Returns the value of a single layer.
    pub fn layer(&self, layer: WearLayer) -> f64 {
        match layer {
            WearLayer::Displacement => self.displacement,
            WearLayer::Discoloration => self.discoloration,
            WearLayer::Damage => self.damage,
        }
    }
}

/// Motion coherence output for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub category: MotionCategory,
    /// 0.0 = chaotic, 1.0 = unified
    pub coherence: f64,
    /// 0.0 = fully active, 1.0 = settled
    pub settle_progress: f64,
    /// Residual micro-motion that persists after settling
    pub residual_motion: f64,
}

/// An active attraction boost applied to this region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionBoost {
    /// Region broadcasting the overflow pressure
    pub source_region: String,
    pub category: BoostCategory,
    /// Additive boost strength, 0.0 to 1.0
    pub strength: f64,
}

/// Complete per-region output for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOutput {
    pub region_id: String,
    /// Tick index at which this snapshot was published
    pub tick: u64,
    /// Simulation seconds at publication
    pub time_seconds: f64,
    /// Smoothed population ratio driving the indices
    pub population: f64,
    /// Fast audio-analogue index, -1.0 to 1.0
    pub fast_index: f64,
    /// Lagged visual-analogue index, -1.0 to 1.0
    pub lagged_index: f64,
    /// Mean of fast and lagged indices
    pub combined_pressure: f64,
    /// fast - lagged; positive while audio leads
    pub pressure_differential: f64,
    pub phase: PressurePhase,
    pub wildlife: Vec<WildlifeTierSnapshot>,
    pub npc_comfort: Vec<NpcComfortSnapshot>,
    pub wear: Vec<SurfaceWearSnapshot>,
    pub motion: Vec<MotionSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attraction: Vec<AttractionBoost>,
}

impl RegionOutput {
    /// Creates an empty output for a freshly registered region.
    pub fn new(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            tick: 0,
            time_seconds: 0.0,
            population: 0.0,
            fast_index: 0.0,
            lagged_index: 0.0,
            combined_pressure: 0.0,
            pressure_differential: 0.0,
            phase: PressurePhase::Pristine,
            wildlife: Vec::new(),
            npc_comfort: Vec::new(),
            wear: Vec::new(),
            motion: Vec::new(),
            attraction: Vec::new(),
        }
    }

    /// Finds the snapshot for a wildlife tier.
    pub fn wildlife_tier(&self, tier: WildlifeTier) -> Option<&WildlifeTierSnapshot> {
        self.wildlife.iter().find(|w| w.tier == tier)
    }

    /// Finds the comfort snapshot for an NPC profile by name.
    pub fn npc_profile(&self, profile: &str) -> Option<&NpcComfortSnapshot> {
        self.npc_comfort.iter().find(|n| n.profile == profile)
    }

    /// Finds the wear snapshot for a surface by name.
    pub fn surface(&self, surface: &str) -> Option<&SurfaceWearSnapshot> {
        self.wear.iter().find(|w| w.surface == surface)
    }

    /// Finds the motion snapshot for a category.
    pub fn motion_category(&self, category: MotionCategory) -> Option<&MotionSnapshot> {
        self.motion.iter().find(|m| m.category == category)
    }

    /// Returns the strongest active boost for a category, or 0.0.
    ///
    /// Simultaneous sources combine by maximum, never by sum.
    pub fn boost(&self, category: BoostCategory) -> f64 {
        self.attraction
            .iter()
            .filter(|b| b.category == category)
            .map(|b| b.strength)
            .fold(0.0, f64::max)
    }

    /// Serializes the snapshot to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
