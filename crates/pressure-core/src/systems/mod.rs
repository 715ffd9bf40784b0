//! Dependent subsystems driven by region population and pressure.

pub mod motion;
pub mod npc;
pub mod wear;
pub mod wildlife;

pub use motion::MotionModel;
pub use wear::WearModel;
pub use wildlife::WildlifeModel;
