//! Enlarger Profile — spec.md §3, §9.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::grade::GRADE_COUNT;

/// Values above this are rejected outright (spec.md §3: "every value <= ~65s").
pub const FIELD_CEILING_MS: u32 = u16::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelCount {
    Rgb,
    Rgbw,
}

impl ChannelCount {
    pub fn len(self) -> usize {
        match self {
            ChannelCount::Rgb => 3,
            ChannelCount::Rgbw => 4,
        }
    }
}

/// Tagged union from spec.md §9: either a mechanical relay (contrast
/// via filter) or a dimmable RGB/RGBW head addressed by channel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnlargerControl {
    Relay,
    DmxRgbw {
        channels: ChannelCount,
        focus_val: [u16; 4],
        safe_val: [u16; 4],
        /// Per-grade channel target, one entry per `ContrastGrade`.
        grade_values: [[u16; 4]; GRADE_COUNT],
    },
}

/// Immutable record describing one lamp-and-head combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnlargerProfile {
    /// ms from relay-on to light level starting to rise.
    pub turn_on_delay: u32,
    /// ms from rise start until it approaches peak.
    pub rise_time: u32,
    /// ms at full output equivalent to the exposure integrated across `rise_time`.
    pub rise_time_equiv: u32,
    /// ms from relay-off to light level starting to fall.
    pub turn_off_delay: u32,
    /// ms from fall start until fully off.
    pub fall_time: u32,
    /// ms at full output equivalent to the exposure integrated across `fall_time`.
    pub fall_time_equiv: u32,
    pub contrast_filter: Option<String>,
    pub control: Option<EnlargerControl>,
}

impl EnlargerProfile {
    /// Open Question (spec.md §9) resolved: all six timing fields are
    /// checked against `FIELD_CEILING_MS`, not just the four the
    /// original firmware happened to check twice (see DESIGN.md).
    pub fn is_valid(&self) -> bool {
        let fields = [
            self.turn_on_delay,
            self.rise_time,
            self.rise_time_equiv,
            self.turn_off_delay,
            self.fall_time,
            self.fall_time_equiv,
        ];
        if fields.iter().any(|&v| v > FIELD_CEILING_MS) {
            return false;
        }
        if self.rise_time_equiv > self.rise_time {
            return false;
        }
        if self.fall_time_equiv > self.fall_time {
            return false;
        }
        true
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProfileError::EnlargerInvalid(
                "timing fields violate enlarger profile invariants".into(),
            ))
        }
    }

    /// `rise_time_equiv + fall_time_equiv + turn_off_delay` (spec.md §3).
    pub fn min_exposure_ms(&self) -> u32 {
        self.rise_time_equiv + self.fall_time_equiv + self.turn_off_delay
    }
}

impl Default for EnlargerProfile {
    fn default() -> Self {
        Self {
            turn_on_delay: 50,
            rise_time: 200,
            rise_time_equiv: 100,
            turn_off_delay: 20,
            fall_time: 150,
            fall_time_equiv: 80,
            contrast_filter: None,
            control: Some(EnlargerControl::Relay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert!(EnlargerProfile::default().is_valid());
    }

    #[test]
    fn rejects_rise_time_equiv_exceeding_rise_time() {
        let mut p = EnlargerProfile::default();
        p.rise_time_equiv = p.rise_time + 1;
        assert!(!p.is_valid());
    }

    #[test]
    fn rejects_fall_time_equiv_exceeding_fall_time() {
        let mut p = EnlargerProfile::default();
        p.fall_time_equiv = p.fall_time + 1;
        assert!(!p.is_valid());
    }

    #[test]
    fn rejects_field_above_ceiling() {
        let mut p = EnlargerProfile::default();
        p.fall_time = FIELD_CEILING_MS + 1;
        assert!(!p.is_valid());
    }

    #[test]
    fn min_exposure_matches_formula() {
        let p = EnlargerProfile::default();
        assert_eq!(
            p.min_exposure_ms(),
            p.rise_time_equiv + p.fall_time_equiv + p.turn_off_delay
        );
    }
}
