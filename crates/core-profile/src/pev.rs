//! Printing Exposure Value math — spec.md §3, GLOSSARY.
//!
//! `PEV = log10(H) * 100`, carried as an integer-valued `lev100` unit
//! throughout the profile and exposure layers.

/// Convert an exposure `H` (lux-seconds) to its `lev100` representation.
/// `H` must be strictly positive; non-positive or non-finite input
/// returns `None` rather than a nonsensical logarithm.
pub fn pev_from_exposure(h_lux_seconds: f64) -> Option<i32> {
    if !h_lux_seconds.is_finite() || h_lux_seconds <= 0.0 {
        return None;
    }
    Some((h_lux_seconds.log10() * 100.0).round() as i32)
}

/// Inverse of `pev_from_exposure`: recover the exposure in lux-seconds
/// from a `lev100` value.
pub fn exposure_from_pev(lev100: i32) -> f64 {
    10f64.powf(lev100 as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_close() {
        let original = 4.2;
        let lev = pev_from_exposure(original).unwrap();
        let back = exposure_from_pev(lev);
        assert!((back - original).abs() < 0.05);
    }

    #[test]
    fn rejects_non_positive_exposure() {
        assert_eq!(pev_from_exposure(0.0), None);
        assert_eq!(pev_from_exposure(-1.0), None);
    }

    #[test]
    fn one_lux_second_is_zero_lev100() {
        assert_eq!(pev_from_exposure(1.0), Some(0));
    }
}
