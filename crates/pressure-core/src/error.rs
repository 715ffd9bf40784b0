//! Error taxonomy for the coordinator API.
//!
//! Invalid population input is deliberately absent here: population is a
//! continuously driven external signal and is recovered locally (clamped,
//! NaN keeps the prior value) rather than surfaced, so a noisy driver can
//! never halt the simulation.

use thiserror::Error;

/// Errors surfaced by the coordinator's in-process API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PressureError {
    /// An operation referenced a region id that was never registered.
    #[error("unknown region: '{0}'")]
    UnknownRegion(String),

    /// A registration collided with an existing region id.
    #[error("region '{0}' is already registered")]
    DuplicateRegion(String),

    /// `tick` was called with a negative or non-finite delta.
    #[error("invalid timestep: {0} (delta_time must be finite and >= 0)")]
    InvalidTimestep(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PressureError::UnknownRegion("forest".to_string());
        assert_eq!(err.to_string(), "unknown region: 'forest'");

        let err = PressureError::DuplicateRegion("town".to_string());
        assert_eq!(err.to_string(), "region 'town' is already registered");

        let err = PressureError::InvalidTimestep(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }
}
