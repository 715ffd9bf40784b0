//! Pressure phase classification.
//!
//! The phase is a derived, observability-only view of where a region sits
//! in the fast/lagged index cycle. It is never authoritative state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite pressure phase for a region.
///
/// Classified from the fast (audio-analogue) and lagged (visual-analogue)
/// indices against low/high thresholds. The fast index reacts first, so a
/// crowding region passes through `AudioLeading` before `FullyPressured`,
/// and an emptying one lingers in `VisualTrailing` before recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PressurePhase {
    /// Both indices low
    #[default]
    Pristine,
    /// Fast index high, lagged index still low
    AudioLeading,
    /// Both indices high
    FullyPressured,
    /// Fast index low again, lagged index still high
    VisualTrailing,
    /// Neither clearly high nor clearly low
    Recovering,
}

impl PressurePhase {
    /// Classifies a phase from the two indices.
    ///
    /// `low` and `high` are the band edges; values between them fall into
    /// the `Recovering` band unless the other index pins a named phase.
    pub fn classify(fast_index: f64, lagged_index: f64, low: f64, high: f64) -> Self {
        let fast_high = fast_index > high;
        let fast_low = fast_index < low;
        let lagged_high = lagged_index > high;
        let lagged_low = lagged_index < low;

        if fast_low && lagged_low {
            PressurePhase::Pristine
        } else if fast_high && lagged_low {
            PressurePhase::AudioLeading
        } else if fast_high && lagged_high {
            PressurePhase::FullyPressured
        } else if fast_low && lagged_high {
            PressurePhase::VisualTrailing
        } else {
            PressurePhase::Recovering
        }
    }

    /// Returns true if the region is under pressure on either channel.
    pub fn is_pressured(self) -> bool {
        matches!(
            self,
            PressurePhase::AudioLeading
                | PressurePhase::FullyPressured
                | PressurePhase::VisualTrailing
        )
    }
}

impl fmt::Display for PressurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressurePhase::Pristine => write!(f, "pristine"),
            PressurePhase::AudioLeading => write!(f, "audio_leading"),
            PressurePhase::FullyPressured => write!(f, "fully_pressured"),
            PressurePhase::VisualTrailing => write!(f, "visual_trailing"),
            PressurePhase::Recovering => write!(f, "recovering"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: f64 = 0.25;
    const HIGH: f64 = 0.5;

    #[test]
    fn test_classify_pristine() {
        assert_eq!(
            PressurePhase::classify(-0.3, 0.0, LOW, HIGH),
            PressurePhase::Pristine
        );
    }

    #[test]
    fn test_classify_audio_leading() {
        assert_eq!(
            PressurePhase::classify(0.7, 0.1, LOW, HIGH),
            PressurePhase::AudioLeading
        );
    }

    #[test]
    fn test_classify_fully_pressured() {
        assert_eq!(
            PressurePhase::classify(0.8, 0.6, LOW, HIGH),
            PressurePhase::FullyPressured
        );
    }

    #[test]
    fn test_classify_visual_trailing() {
        assert_eq!(
            PressurePhase::classify(0.1, 0.6, LOW, HIGH),
            PressurePhase::VisualTrailing
        );
    }

    #[test]
    fn test_classify_recovering_band() {
        // Both indices between low and high
        assert_eq!(
            PressurePhase::classify(0.35, 0.4, LOW, HIGH),
            PressurePhase::Recovering
        );
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&PressurePhase::AudioLeading).unwrap(),
            r#""audio_leading""#
        );
        assert_eq!(
            serde_json::to_string(&PressurePhase::VisualTrailing).unwrap(),
            r#""visual_trailing""#
        );
    }

    #[test]
    fn test_display_matches_serde() {
        let phases = [
            PressurePhase::Pristine,
            PressurePhase::AudioLeading,
            PressurePhase::FullyPressured,
            PressurePhase::VisualTrailing,
            PressurePhase::Recovering,
        ];
        for phase in phases {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase));
        }
    }

    #[test]
    fn test_is_pressured() {
        assert!(!PressurePhase::Pristine.is_pressured());
        assert!(PressurePhase::AudioLeading.is_pressured());
        assert!(PressurePhase::FullyPressured.is_pressured());
        assert!(PressurePhase::VisualTrailing.is_pressured());
        assert!(!PressurePhase::Recovering.is_pressured());
    }
}
