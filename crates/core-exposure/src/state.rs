//! Exposure State — spec.md §3.

use smallvec::SmallVec;

use core_profile::ContrastGrade;

use crate::error::ExposureError;

pub const MAX_BURN_DODGE_ENTRIES: usize = 9;
pub const MIN_ADJUSTMENT_VALUE: i32 = -144;
pub const MAX_ADJUSTMENT_VALUE: i32 = 144;
pub const MIN_ADJUSTED_TIME_SECONDS: f64 = 0.01;
pub const MAX_ADJUSTED_TIME_SECONDS: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    PrintingBw,
    PrintingColor,
    Densitometer,
    Calibration,
}

/// Step size applied by a single press of inc/dec exposure, expressed
/// in twelfths of a stop (the same unit as `adjustment_value`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentIncrement {
    Twelfth,
    Sixth,
    Quarter,
    Third,
    Half,
    One,
}

impl AdjustmentIncrement {
    pub fn as_twelfths(self) -> i32 {
        match self {
            AdjustmentIncrement::Twelfth => 1,
            AdjustmentIncrement::Sixth => 2,
            AdjustmentIncrement::Quarter => 3,
            AdjustmentIncrement::Third => 4,
            AdjustmentIncrement::Half => 6,
            AdjustmentIncrement::One => 12,
        }
    }
}

/// One burn or dodge adjustment: a signed fraction of a stop, applied
/// either against the base grade or an explicit override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnDodgeEntry {
    pub numerator: i32,
    pub denominator: u32,
    pub grade_override: Option<ContrastGrade>,
}

impl BurnDodgeEntry {
    pub fn stops(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Which reference a Densitometer-mode reading is measured against:
/// the probed base exposure, or the currently active test-strip patch.
/// Supplemental to the core data model — toggled while metering to
/// decide what `DensitometerState` reports relative density against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PevPreset {
    #[default]
    Base,
    Strip,
}

impl PevPreset {
    pub fn toggled(self) -> Self {
        match self {
            PevPreset::Base => PevPreset::Strip,
            PevPreset::Strip => PevPreset::Base,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExposureState {
    pub mode: ExposureMode,
    pub base_time: f64,
    pub contrast_grade: ContrastGrade,
    pub adjustment_value: i32,
    pub adjustment_increment: AdjustmentIncrement,
    burn_dodge: SmallVec<[BurnDodgeEntry; MAX_BURN_DODGE_ENTRIES]>,
    pub channel_levels: [u16; 4],
    /// Lux readings recorded so far this session, oldest first.
    meter_readings: Vec<f64>,
    pub paper_profile_index: usize,
    pub pev_preset: PevPreset,
    /// `lev100` of the most recently run test-strip patch, set by the
    /// test-strip state as it exposes each patch. `None` until the first
    /// patch of a strip has run.
    pub strip_patch_lev100: Option<i32>,
}

impl ExposureState {
    pub fn new(mode: ExposureMode, base_time: f64, contrast_grade: ContrastGrade) -> Self {
        Self {
            mode,
            base_time,
            contrast_grade,
            adjustment_value: 0,
            adjustment_increment: AdjustmentIncrement::Third,
            burn_dodge: SmallVec::new(),
            channel_levels: [0; 4],
            meter_readings: Vec::new(),
            paper_profile_index: 0,
            pev_preset: PevPreset::default(),
            strip_patch_lev100: None,
        }
    }

    pub fn set_adjustment_value(&mut self, value: i32) -> Result<(), ExposureError> {
        if !(MIN_ADJUSTMENT_VALUE..=MAX_ADJUSTMENT_VALUE).contains(&value) {
            return Err(ExposureError::AdjustmentOutOfRange(value));
        }
        self.adjustment_value = value;
        Ok(())
    }

    pub fn burn_dodge_entries(&self) -> &[BurnDodgeEntry] {
        &self.burn_dodge
    }

    pub fn meter_readings(&self) -> &[f64] {
        &self.meter_readings
    }

    pub(crate) fn push_meter_reading(&mut self, lux: f64) {
        self.meter_readings.push(lux);
    }

    pub fn clear_meter_readings(&mut self) {
        self.meter_readings.clear();
    }

    fn validate_entry(&self, index: usize, entry: BurnDodgeEntry) -> Result<(), ExposureError> {
        let ceiling = 9 * entry.denominator as i32;
        if entry.numerator < -ceiling || entry.numerator > ceiling {
            return Err(ExposureError::BurnDodgeNumeratorOutOfRange {
                numerator: entry.numerator,
                denominator: entry.denominator,
            });
        }
        if entry.numerator < 0 && index != 0 {
            return Err(ExposureError::DodgeNotFirstEntry);
        }
        Ok(())
    }

    pub fn add_burn_dodge(&mut self, entry: BurnDodgeEntry) -> Result<usize, ExposureError> {
        if self.burn_dodge.len() >= MAX_BURN_DODGE_ENTRIES {
            return Err(ExposureError::BurnDodgeListFull);
        }
        let index = self.burn_dodge.len();
        self.validate_entry(index, entry)?;
        self.burn_dodge.push(entry);
        Ok(index)
    }

    pub fn set_burn_dodge(&mut self, index: usize, entry: BurnDodgeEntry) -> Result<(), ExposureError> {
        if index >= self.burn_dodge.len() {
            return Err(ExposureError::BurnDodgeIndexOutOfBounds(index));
        }
        self.validate_entry(index, entry)?;
        self.burn_dodge[index] = entry;
        Ok(())
    }

    pub fn remove_burn_dodge(&mut self, index: usize) -> Result<BurnDodgeEntry, ExposureError> {
        if index >= self.burn_dodge.len() {
            return Err(ExposureError::BurnDodgeIndexOutOfBounds(index));
        }
        Ok(self.burn_dodge.remove(index))
    }
}

/// A 17-bit mask over a `u32`: bit 0 is the below-scale tone, bit 16
/// the above-scale tone, bits 1..=15 the fifteen paper tones between
/// `Ht` and `Hs`. `overlay` carries a live probe cursor independent of
/// the accumulated `bits`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneGraph {
    pub bits: u32,
    pub overlay: Option<u8>,
}

impl ToneGraph {
    pub const UNDER_SCALE_BIT: u8 = 0;
    pub const OVER_SCALE_BIT: u8 = 16;

    pub fn set_bit(&mut self, bit: u8) {
        self.bits |= 1u32 << bit;
    }

    pub fn is_set(&self, bit: u8) -> bool {
        self.bits & (1u32 << bit) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ExposureState {
        ExposureState::new(ExposureMode::PrintingBw, 10.0, ContrastGrade::G2)
    }

    #[test]
    fn adjustment_value_rejects_out_of_range() {
        let mut s = state();
        assert!(s.set_adjustment_value(145).is_err());
        assert!(s.set_adjustment_value(-145).is_err());
        assert!(s.set_adjustment_value(144).is_ok());
    }

    #[test]
    fn dodge_allowed_only_on_first_entry() {
        let mut s = state();
        s.add_burn_dodge(BurnDodgeEntry {
            numerator: -3,
            denominator: 3,
            grade_override: None,
        })
        .unwrap();
        let err = s.add_burn_dodge(BurnDodgeEntry {
            numerator: -1,
            denominator: 3,
            grade_override: None,
        });
        assert_eq!(err, Err(ExposureError::DodgeNotFirstEntry));
    }

    #[test]
    fn numerator_must_stay_within_nine_denominators() {
        let mut s = state();
        let err = s.add_burn_dodge(BurnDodgeEntry {
            numerator: 28,
            denominator: 3,
            grade_override: None,
        });
        assert!(err.is_err());
    }

    #[test]
    fn burn_dodge_list_caps_at_nine() {
        let mut s = state();
        s.add_burn_dodge(BurnDodgeEntry {
            numerator: -1,
            denominator: 3,
            grade_override: None,
        })
        .unwrap();
        for _ in 0..8 {
            s.add_burn_dodge(BurnDodgeEntry {
                numerator: 1,
                denominator: 3,
                grade_override: None,
            })
            .unwrap();
        }
        let err = s.add_burn_dodge(BurnDodgeEntry {
            numerator: 1,
            denominator: 3,
            grade_override: None,
        });
        assert_eq!(err, Err(ExposureError::BurnDodgeListFull));
    }

    #[test]
    fn tone_graph_bits_round_trip() {
        let mut tg = ToneGraph::default();
        tg.set_bit(ToneGraph::UNDER_SCALE_BIT);
        tg.set_bit(7);
        tg.set_bit(ToneGraph::OVER_SCALE_BIT);
        assert!(tg.is_set(0));
        assert!(tg.is_set(7));
        assert!(tg.is_set(16));
        assert!(!tg.is_set(8));
    }
}
