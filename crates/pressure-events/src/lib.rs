//! Shared output types for the pressure coordination engine.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is the contract between the engine and whatever transport or
//! renderer consumes region snapshots.

pub mod phase;
pub mod snapshot;

// Re-export phase types
pub use phase::PressurePhase;

// Re-export snapshot types
pub use snapshot::{
    AttractionBoost, BoostCategory, ComfortLevel, MotionCategory, MotionSnapshot,
    NpcComfortSnapshot, RegionOutput, SurfaceWearSnapshot, WearLayer, WildlifeState,
    WildlifeTier, WildlifeTierSnapshot,
};
