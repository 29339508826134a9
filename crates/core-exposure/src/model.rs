//! Exposure Model — pure functions over `ExposureState` (spec.md §4.2).
//!
//! Nothing in this module performs IO or owns a clock; every function
//! takes its state by reference (or `&mut` to append a reading) and
//! returns a value.

use core_profile::EnlargerProfile;

use crate::error::ExposureError;
use crate::state::{ExposureState, MAX_ADJUSTED_TIME_SECONDS, MIN_ADJUSTED_TIME_SECONDS};

/// `base · 2^(adj/12)`.
pub fn exposure_time(state: &ExposureState) -> f64 {
    state.base_time * 2f64.powf(state.adjustment_value as f64 / 12.0)
}

pub fn validate_adjusted_time(seconds: f64) -> Result<(), ExposureError> {
    if (MIN_ADJUSTED_TIME_SECONDS..=MAX_ADJUSTED_TIME_SECONDS).contains(&seconds) {
        Ok(())
    } else {
        Err(ExposureError::AdjustedTimeOutOfRange(seconds))
    }
}

/// `adjusted · 2^((step · i)/12)` where `step` is the active
/// adjustment increment, expressed in twelfths.
pub fn test_strip_time_complete(state: &ExposureState, patch_index: i32) -> f64 {
    let adjusted = exposure_time(state);
    let step = state.adjustment_increment.as_twelfths();
    adjusted * 2f64.powf((step * patch_index) as f64 / 12.0)
}

/// Delta between the `covered`-th and `(covered-1)`-th complete patch
/// starting from `min_patch`; at `covered == 0` this is simply the
/// complete time for the first patch.
pub fn test_strip_time_incremental(state: &ExposureState, min_patch: i32, covered: u32) -> f64 {
    if covered == 0 {
        return test_strip_time_complete(state, min_patch);
    }
    let current = test_strip_time_complete(state, min_patch + covered as i32);
    let previous = test_strip_time_complete(state, min_patch + covered as i32 - 1);
    current - previous
}

/// `rise_time_equiv + fall_time_equiv + turn_off_delay`, in seconds.
pub fn min_exposure_time(profile: &EnlargerProfile) -> f64 {
    profile.min_exposure_ms() as f64 / 1000.0
}

/// Tone bin selection rule (spec.md §4.2): given a reading `lux`
/// relative to the lowest ("reference") reading recorded so far, and
/// the paper grade's `Ht`/`Hs` thresholds in `lev100` units, returns
/// the tone-graph bit that reading contributes.
///
/// `-inf` (a reading below the reference, since it's the minimum by
/// construction, only occurs when `lux <= 0.0`) maps to bit 0; any
/// result `>= 15` maps to bit 16.
pub fn tone_graph_bit(reference_lux: f64, lux: f64, ht_lev100: u32, hs_lev100: u32) -> u8 {
    if lux <= 0.0 || reference_lux <= 0.0 {
        return 0;
    }
    let span = hs_lev100 as f64 - ht_lev100 as f64;
    if span <= 0.0 {
        return 0;
    }
    let lev100 = (lux / reference_lux).log10() * 100.0;
    let raw = ((15.0 * (lev100 - ht_lev100 as f64)) / span).floor();
    if raw < 0.0 {
        0
    } else if raw >= 15.0 {
        16
    } else {
        raw as u8 + 1
    }
}

fn reference_lux(readings: &[f64]) -> Option<f64> {
    readings
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

/// Non-mutating cursor lookup: what bit would `lux` contribute right now.
pub fn meter_reading_tone(
    state: &ExposureState,
    lux: f64,
    ht_lev100: u32,
    hs_lev100: u32,
) -> u8 {
    let reference = reference_lux(state.meter_readings()).unwrap_or(lux);
    tone_graph_bit(reference, lux, ht_lev100, hs_lev100)
}

/// Append `lux` to the rolling reading list and return the tone bit it
/// contributes.
pub fn add_meter_reading(
    state: &mut ExposureState,
    lux: f64,
    ht_lev100: u32,
    hs_lev100: u32,
) -> u8 {
    let bit = meter_reading_tone(state, lux, ht_lev100, hs_lev100);
    state.push_meter_reading(lux);
    bit
}

/// Full tone graph accumulated from every reading recorded so far.
pub fn tone_graph(state: &ExposureState, ht_lev100: u32, hs_lev100: u32) -> u32 {
    let readings = state.meter_readings();
    let Some(reference) = reference_lux(readings) else {
        return 0;
    };
    readings.iter().fold(0u32, |mask, &lux| {
        mask | (1u32 << tone_graph_bit(reference, lux, ht_lev100, hs_lev100))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_profile::ContrastGrade;
    use crate::state::ExposureMode;

    fn state() -> ExposureState {
        ExposureState::new(ExposureMode::PrintingBw, 10.0, ContrastGrade::G2)
    }

    #[test]
    fn exposure_time_is_unity_at_zero_adjustment() {
        let s = state();
        assert!((exposure_time(&s) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn exposure_time_doubles_at_plus_twelve_twelfths() {
        let mut s = state();
        s.set_adjustment_value(12).unwrap();
        assert!((exposure_time(&s) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_strip_time_incremental_at_zero_is_the_complete_first_patch() {
        let s = state();
        let complete = test_strip_time_complete(&s, 0);
        let incremental = test_strip_time_incremental(&s, 0, 0);
        assert!((complete - incremental).abs() < 1e-9);
    }

    #[test]
    fn test_strip_time_incremental_is_positive_delta() {
        let s = state();
        let delta = test_strip_time_incremental(&s, 0, 2);
        assert!(delta > 0.0);
    }

    #[test]
    fn reference_reading_maps_to_bottom_tone() {
        let mut s = state();
        let bit = add_meter_reading(&mut s, 1.0, 0, 1500);
        assert_eq!(bit, 1);
    }

    #[test]
    fn brighter_reading_than_reference_is_clamped_to_top_bit() {
        let mut s = state();
        add_meter_reading(&mut s, 1.0, 0, 1500);
        let bit = add_meter_reading(&mut s, 1000.0, 0, 1500);
        assert_eq!(bit, 16);
    }

    #[test]
    fn tone_graph_accumulates_across_readings() {
        let mut s = state();
        add_meter_reading(&mut s, 1.0, 0, 1500);
        add_meter_reading(&mut s, 1000.0, 0, 1500);
        let mask = tone_graph(&s, 0, 1500);
        assert_ne!(mask, 0);
        assert_eq!(mask.count_ones() >= 1, true);
    }
}
