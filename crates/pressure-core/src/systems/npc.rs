//! NPC comfort evaluation.
//!
//! Stateless per tick: each profile scales the region population by its
//! own sensitivity, maps the result onto five comfort levels, and reads
//! idle variety and interaction radius off the level tables. Children feel
//! a crowd before guards do purely through the sensitivity multiplier.

use pressure_events::{ComfortLevel, NpcComfortSnapshot};

use crate::config::NpcConfig;

/// Evaluates comfort for every configured profile.
///
/// `idle_boost` is the active idle-richness attraction boost; it grants
/// extra idle behaviors to quiet regions near an overflowing one.
pub fn evaluate(config: &NpcConfig, population: f64, idle_boost: f64) -> Vec<NpcComfortSnapshot> {
    let extra_idle = (idle_boost * 3.0).round().max(0.0) as u32;
    config
        .profiles
        .iter()
        .map(|profile| {
            let effective = (population * profile.sensitivity).clamp(0.0, 1.0);
            let comfort = config.comfort_level(effective);
            let level = NpcConfig::level_index(comfort);
            NpcComfortSnapshot {
                profile: profile.name.clone(),
                comfort,
                effective_population: effective,
                idle_variety: config.idle_variety[level] + extra_idle,
                edge_seeking: profile.can_relocate && comfort >= ComfortLevel::Stressed,
                interaction_radius_scale: profile.interaction_radius_modifier
                    * config.radius_scale[level],
            }
        })
        .collect()
}
