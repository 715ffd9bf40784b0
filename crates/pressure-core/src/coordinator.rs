//! Region registry and tick orchestration.
//!
//! The coordinator owns all per-region state and advances it with explicit
//! `tick(delta_time)` calls. Output is double-buffered: every read goes to
//! the snapshot published at the end of the previous tick, and a tick
//! writes the off buffer for every region before any flip becomes visible.
//! Cross-region attraction reads the same published snapshots, so no
//! region's update ever observes another region's same-tick state.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use pressure_events::{AttractionBoost, BoostCategory, PressurePhase, RegionOutput};

use crate::attraction::{AttractionBroadcaster, RegionSample};
use crate::config::EngineConfig;
use crate::error::PressureError;
use crate::indices::{FastIndexModel, LaggedIndexModel};
use crate::systems::{npc, MotionModel, WearModel, WildlifeModel};

struct RegionState {
    position: (f64, f64),
    /// Raw population target from the last `set_population` call
    target_population: f64,
    /// Smoothed population actually driving the subsystems
    population: f64,
    lagged: LaggedIndexModel,
    wildlife: WildlifeModel,
    wear: WearModel,
    motion: MotionModel,
    buffers: [RegionOutput; 2],
    published: usize,
}

/// The engine. One instance coordinates every registered region.
pub struct PressureCoordinator {
    config: EngineConfig,
    fast_model: FastIndexModel,
    regions: BTreeMap<String, RegionState>,
    broadcaster: AttractionBroadcaster,
    tick: u64,
    time_seconds: f64,
}

impl PressureCoordinator {
    /// Creates an empty coordinator.
    pub fn new(config: EngineConfig) -> Self {
        let fast_model = FastIndexModel::new(&config.indices);
        Self {
            config,
            fast_model,
            regions: BTreeMap::new(),
            broadcaster: AttractionBroadcaster::new(),
            tick: 0,
            time_seconds: 0.0,
        }
    }

    /// Registers a region at a world position.
    ///
    /// The region starts empty and pristine; its first snapshot is
    /// readable immediately, before any tick.
    pub fn register_region(
        &mut self,
        region_id: &str,
        position: (f64, f64),
    ) -> Result<(), PressureError> {
        if self.regions.contains_key(region_id) {
            return Err(PressureError::DuplicateRegion(region_id.to_string()));
        }
        let initial = self.initial_output(region_id);
        let state = RegionState {
            position,
            target_population: 0.0,
            population: 0.0,
            lagged: LaggedIndexModel::new(region_id, &self.config.indices),
            wildlife: WildlifeModel::new(),
            wear: WearModel::new(&self.config.wear),
            motion: MotionModel::new(),
            buffers: [initial.clone(), initial],
            published: 0,
        };
        self.regions.insert(region_id.to_string(), state);
        debug!(region = region_id, ?position, "region registered");
        Ok(())
    }

    /// Removes a region and any attraction signal it was broadcasting.
    pub fn remove_region(&mut self, region_id: &str) -> Result<(), PressureError> {
        if self.regions.remove(region_id).is_none() {
            return Err(PressureError::UnknownRegion(region_id.to_string()));
        }
        self.broadcaster.clear_source(region_id);
        debug!(region = region_id, "region removed");
        Ok(())
    }

    /// Sets a region's population target for the next tick.
    ///
    /// Out-of-range values clamp to [0, 1]. A NaN keeps the previous
    /// target; the engine never lets a NaN propagate into region state.
    pub fn set_population(
        &mut self,
        region_id: &str,
        population: f64,
    ) -> Result<(), PressureError> {
        let region = self
            .regions
            .get_mut(region_id)
            .ok_or_else(|| PressureError::UnknownRegion(region_id.to_string()))?;
        if population.is_nan() {
            warn!(region = region_id, "ignoring NaN population update");
            return Ok(());
        }
        if !(0.0..=1.0).contains(&population) {
            debug!(region = region_id, population, "clamping population to [0, 1]");
        }
        region.target_population = population.clamp(0.0, 1.0);
        Ok(())
    }

    /// Advances the whole engine by `delta_time` seconds.
    ///
    /// A zero timestep is a no-op: the published snapshots stay exactly
    /// as they were. Negative or non-finite timesteps are rejected
    /// without touching any state.
    pub fn tick(&mut self, delta_time: f64) -> Result<(), PressureError> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(PressureError::InvalidTimestep(delta_time));
        }
        if delta_time == 0.0 {
            return Ok(());
        }
        self.tick += 1;
        self.time_seconds += delta_time;
        let now = self.time_seconds;

        // Attraction reads last tick's published snapshots
        let samples: Vec<RegionSample<'_>> = self
            .regions
            .iter()
            .map(|(id, region)| {
                let snap = &region.buffers[region.published];
                RegionSample {
                    region_id: id.as_str(),
                    position: region.position,
                    population: snap.population,
                    pressure: snap.fast_index.max(snap.lagged_index),
                }
            })
            .collect();
        let mut boosts = self.broadcaster.step(now, &samples, &self.config.attraction);
        drop(samples);

        let config = &self.config;
        for (id, region) in self.regions.iter_mut() {
            let rate = (delta_time * config.indices.fast_smoothing_rate).min(1.0);
            region.population += (region.target_population - region.population) * rate;

            let fast = self.fast_model.compute(region.population);
            let lagged = region
                .lagged
                .step(now, self.tick, delta_time, fast, &config.indices);

            let region_boosts = boosts.remove(id.as_str()).unwrap_or_default();
            let spawn_boost = max_boost(&region_boosts, BoostCategory::WildlifeSpawn);
            let motion_boost = max_boost(&region_boosts, BoostCategory::MotionCoherence);
            let idle_boost = max_boost(&region_boosts, BoostCategory::NpcIdleRichness);

            region.wildlife.step(region.population, delta_time, &config.wildlife);
            region.wear.step(region.population, delta_time, &config.wear);
            region
                .motion
                .step(region.population, delta_time, &config.motion, motion_boost);

            let phase = PressurePhase::classify(
                fast,
                lagged,
                config.indices.low_threshold,
                config.indices.high_threshold,
            );
            let previous_phase = region.buffers[region.published].phase;
            if phase != previous_phase {
                debug!(region = %id, from = %previous_phase, to = %phase, "pressure phase changed");
            }

            let back = 1 - region.published;
            let out = &mut region.buffers[back];
            out.tick = self.tick;
            out.time_seconds = now;
            out.population = region.population;
            out.fast_index = fast;
            out.lagged_index = lagged;
            out.combined_pressure = (fast + lagged) / 2.0;
            out.pressure_differential = fast - lagged;
            out.phase = phase;
            out.wildlife = region.wildlife.snapshots(&config.wildlife, spawn_boost);
            out.npc_comfort = npc::evaluate(&config.npc, region.population, idle_boost);
            out.wear = region.wear.snapshots();
            out.motion = region.motion.snapshots(&config.motion);
            out.attraction = region_boosts;
            region.published = back;
        }
        Ok(())
    }

    /// Returns the published snapshot for one region.
    pub fn get_snapshot(&self, region_id: &str) -> Result<&RegionOutput, PressureError> {
        self.regions
            .get(region_id)
            .map(|r| &r.buffers[r.published])
            .ok_or_else(|| PressureError::UnknownRegion(region_id.to_string()))
    }

    /// Iterates over all published snapshots in region-id order.
    pub fn snapshots(&self) -> impl Iterator<Item = &RegionOutput> {
        self.regions.values().map(|r| &r.buffers[r.published])
    }

    /// Restores one region to its freshly registered state.
    ///
    /// The position is kept; population, indices, subsystems, and the
    /// region's broadcast signal all reset.
    pub fn reset_region(&mut self, region_id: &str) -> Result<(), PressureError> {
        let initial = self.initial_output(region_id);
        let region = self
            .regions
            .get_mut(region_id)
            .ok_or_else(|| PressureError::UnknownRegion(region_id.to_string()))?;
        region.target_population = 0.0;
        region.population = 0.0;
        region.lagged.reset();
        region.wildlife.reset();
        region.wear.reset();
        region.motion.reset();
        region.buffers = [initial.clone(), initial];
        region.published = 0;
        self.broadcaster.clear_source(region_id);
        debug!(region = region_id, "region reset");
        Ok(())
    }

    /// Published snapshot with the highest combined pressure, if any.
    pub fn most_pressured(&self) -> Option<&RegionOutput> {
        self.snapshots()
            .max_by(|a, b| a.combined_pressure.total_cmp(&b.combined_pressure))
    }

    /// Published snapshot with the lowest combined pressure, if any.
    pub fn least_pressured(&self) -> Option<&RegionOutput> {
        self.snapshots()
            .min_by(|a, b| a.combined_pressure.total_cmp(&b.combined_pressure))
    }

    /// Registered region ids in sorted order.
    pub fn region_ids(&self) -> Vec<&str> {
        self.regions.keys().map(|k| k.as_str()).collect()
    }

    /// Number of registered regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Ticks completed so far.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulation seconds elapsed.
    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    /// Engine configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot for a region that has never ticked.
    fn initial_output(&self, region_id: &str) -> RegionOutput {
        let fast = self.fast_model.compute(0.0);
        let mut out = RegionOutput::new(region_id);
        out.tick = self.tick;
        out.time_seconds = self.time_seconds;
        out.fast_index = fast;
        out.combined_pressure = fast / 2.0;
        out.pressure_differential = fast;
        out.phase = PressurePhase::classify(
            fast,
            0.0,
            self.config.indices.low_threshold,
            self.config.indices.high_threshold,
        );
        out.wildlife = WildlifeModel::new().snapshots(&self.config.wildlife, 0.0);
        out.npc_comfort = npc::evaluate(&self.config.npc, 0.0, 0.0);
        out.wear = WearModel::new(&self.config.wear).snapshots();
        out.motion = MotionModel::new().snapshots(&self.config.motion);
        out
    }
}

fn max_boost(boosts: &[AttractionBoost], category: BoostCategory) -> f64 {
    boosts
        .iter()
        .filter(|b| b.category == category)
        .map(|b| b.strength)
        .fold(0.0, f64::max)
}
