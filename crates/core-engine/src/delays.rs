//! Derived timing delays — spec.md §4.3.1, grounded on `exposure_timer.c`.

use core_profile::EnlargerProfile;

use crate::error::EngineError;

/// Exposures longer than this (ms) are refused outright (`0x100000`,
/// matching `exposure_timer_run`'s hard ceiling).
pub const MAX_EXPOSURE_MS: u32 = 0x0010_0000;

/// Round to the nearest multiple of 10, ties rounding up.
pub fn round_to_10(n: u32) -> u32 {
    let a = (n / 10) * 10;
    let b = a + 10;
    if n - a > b - n {
        b
    } else {
        a
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedDelays {
    pub requested_ms: u32,
    pub relay_on_delay_ms: u32,
    pub relay_off_delay_ms: u32,
    pub exposure_end_delay_ms: u32,
}

impl DerivedDelays {
    /// Derive the three timing offsets from a requested exposure time
    /// and an enlarger profile (spec.md §4.3.1).
    pub fn derive(requested_ms: u32, profile: &EnlargerProfile) -> Self {
        Self {
            requested_ms,
            relay_on_delay_ms: round_to_10(
                profile.turn_on_delay + profile.rise_time.saturating_sub(profile.rise_time_equiv),
            ),
            relay_off_delay_ms: round_to_10(profile.turn_off_delay + profile.fall_time_equiv),
            exposure_end_delay_ms: round_to_10(
                profile.fall_time.saturating_sub(profile.fall_time_equiv),
            ),
        }
    }

    /// Checks the hard constraints `exposure_timer_run` enforces before
    /// starting a run: `T_req > 0`, `T_req <= MAX_EXPOSURE_MS`,
    /// `relay_off_delay < T_req`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.requested_ms == 0 {
            return Err(EngineError::NotConfigured);
        }
        if self.requested_ms > MAX_EXPOSURE_MS {
            return Err(EngineError::ExposureTooLong {
                requested_ms: self.requested_ms,
                max_ms: MAX_EXPOSURE_MS,
            });
        }
        if self.relay_off_delay_ms >= self.requested_ms {
            return Err(EngineError::RelayOffDelayTooLong {
                relay_off_delay_ms: self.relay_off_delay_ms,
                requested_ms: self.requested_ms,
            });
        }
        Ok(())
    }

    /// Whether this run's requested time undercuts the profile's
    /// minimum supported exposure; a soft violation only (flagged to
    /// the UI, not refused).
    pub fn is_below_minimum(&self, min_exposure_ms: u32) -> bool {
        self.requested_ms < round_to_10(min_exposure_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_ties_go_up() {
        assert_eq!(round_to_10(5), 10);
        assert_eq!(round_to_10(4), 0);
        assert_eq!(round_to_10(14), 10);
        assert_eq!(round_to_10(15), 20);
    }

    #[test]
    fn derive_matches_formula() {
        let profile = EnlargerProfile {
            turn_on_delay: 50,
            rise_time: 200,
            rise_time_equiv: 100,
            turn_off_delay: 20,
            fall_time: 150,
            fall_time_equiv: 80,
            contrast_filter: None,
            control: None,
        };
        let delays = DerivedDelays::derive(10_000, &profile);
        assert_eq!(delays.relay_on_delay_ms, round_to_10(50 + (200 - 100)));
        assert_eq!(delays.relay_off_delay_ms, round_to_10(20 + 80));
        assert_eq!(delays.exposure_end_delay_ms, round_to_10(150 - 80));
    }

    #[test]
    fn rejects_relay_off_delay_at_or_past_requested_time() {
        let profile = EnlargerProfile {
            turn_on_delay: 0,
            rise_time: 0,
            rise_time_equiv: 0,
            turn_off_delay: 5000,
            fall_time: 0,
            fall_time_equiv: 0,
            contrast_filter: None,
            control: None,
        };
        let delays = DerivedDelays::derive(1000, &profile);
        assert!(delays.validate().is_err());
    }

    #[test]
    fn rejects_exposure_over_ceiling() {
        let profile = EnlargerProfile::default();
        let delays = DerivedDelays::derive(MAX_EXPOSURE_MS + 10, &profile);
        assert!(delays.validate().is_err());
    }
}
