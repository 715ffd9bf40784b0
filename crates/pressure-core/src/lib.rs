//! Crowding pressure coordination engine.
//!
//! Models per-region crowding as two coupled indices: a fast index that
//! tracks population within seconds, and a lagged index that follows a
//! delayed sample of the fast one with asymmetric rise/fall lag. The gap
//! between them drives everything downstream — wildlife presence, NPC
//! comfort, surface wear, ambient motion coherence, and cross-region
//! attraction — through the [`coordinator::PressureCoordinator`].
//!
//! The engine is fully deterministic: identical registration, population,
//! and tick sequences produce byte-identical snapshots.

pub mod attraction;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod indices;
pub mod jitter;
pub mod sample_buffer;
pub mod systems;

pub use config::{ConfigError, EngineConfig};
pub use coordinator::PressureCoordinator;
pub use error::PressureError;
