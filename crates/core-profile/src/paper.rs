//! Paper Profile — spec.md §3, grounded on `paper_profile.c`.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::grade::{ContrastGrade, GRADE_COUNT};

/// One contrast grade's characteristic curve, expressed as PEV*100
/// (`lev100`) thresholds: toe (`ht`), midtone (`hm`), shoulder (`hs`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperProfileGrade {
    pub ht_lev100: u32,
    pub hm_lev100: u32,
    pub hs_lev100: u32,
}

impl PaperProfileGrade {
    pub fn is_empty(&self) -> bool {
        self.ht_lev100 == 0 && self.hm_lev100 == 0 && self.hs_lev100 == 0
    }

    /// Ht <= Hm <= Hs, or the grade is entirely unset.
    pub fn is_valid(&self) -> bool {
        self.is_empty() || (self.ht_lev100 <= self.hm_lev100 && self.hm_lev100 <= self.hs_lev100)
    }
}

/// Full characteristic-curve set for one type of paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperProfile {
    pub name: String,
    pub grade: [PaperProfileGrade; GRADE_COUNT],
    pub max_net_density: f64,
    pub contrast_filter: Option<String>,
}

impl PaperProfile {
    pub fn is_valid(&self) -> bool {
        if self.name.trim().is_empty() {
            return false;
        }
        if self.max_net_density <= 0.0 {
            return false;
        }
        self.grade.iter().all(PaperProfileGrade::is_valid)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProfileError::PaperInvalid(format!(
                "paper profile {:?} failed validation",
                self.name
            )))
        }
    }

    fn grade_at(&self, g: ContrastGrade) -> PaperProfileGrade {
        self.grade[g.index()]
    }

    fn set_grade(&mut self, g: ContrastGrade, v: PaperProfileGrade) {
        self.grade[g.index()] = v;
    }

    /// Recompute every half grade as the midpoint of its two whole-grade
    /// neighbors. `ContrastGrade::G3Half` follows the literal spec text:
    /// its Ht carries grade 3's value unchanged while Hs and the implied
    /// contrast are averaged. All other half grades average all three
    /// fields of their neighbors (see DESIGN.md for the discrepancy
    /// against the original firmware's G3Half handling).
    pub fn recalculate(&mut self) {
        for g in ContrastGrade::ALL {
            let Some((lo, hi)) = g.half_grade_neighbors() else {
                continue;
            };
            let lo_v = self.grade_at(lo);
            let hi_v = self.grade_at(hi);
            if lo_v.is_empty() || hi_v.is_empty() {
                continue;
            }

            let midpoint = if g == ContrastGrade::G3Half {
                PaperProfileGrade {
                    ht_lev100: lo_v.ht_lev100,
                    hm_lev100: midpoint_u32(lo_v.hm_lev100, hi_v.hm_lev100),
                    hs_lev100: midpoint_u32(lo_v.hs_lev100, hi_v.hs_lev100),
                }
            } else {
                PaperProfileGrade {
                    ht_lev100: midpoint_u32(lo_v.ht_lev100, hi_v.ht_lev100),
                    hm_lev100: midpoint_u32(lo_v.hm_lev100, hi_v.hm_lev100),
                    hs_lev100: midpoint_u32(lo_v.hs_lev100, hi_v.hs_lev100),
                }
            };
            self.set_grade(g, midpoint);
        }
    }
}

fn midpoint_u32(a: u32, b: u32) -> u32 {
    ((a as u64 + b as u64) / 2) as u32
}

impl Default for PaperProfile {
    fn default() -> Self {
        Self {
            name: "Generic variable-contrast paper".into(),
            grade: [PaperProfileGrade::default(); GRADE_COUNT],
            max_net_density: 2.0,
            contrast_filter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(ht: u32, hm: u32, hs: u32) -> PaperProfileGrade {
        PaperProfileGrade {
            ht_lev100: ht,
            hm_lev100: hm,
            hs_lev100: hs,
        }
    }

    #[test]
    fn default_profile_is_valid() {
        assert!(PaperProfile::default().is_valid());
    }

    #[test]
    fn rejects_ht_above_hs() {
        let mut p = PaperProfile::default();
        p.grade[0] = whole(200, 150, 100);
        assert!(!p.is_valid());
    }

    #[test]
    fn recalculate_averages_ordinary_half_grades() {
        let mut p = PaperProfile::default();
        p.set_grade(ContrastGrade::G1, whole(100, 200, 300));
        p.set_grade(ContrastGrade::G2, whole(120, 220, 320));
        p.recalculate();
        assert_eq!(p.grade_at(ContrastGrade::G1Half), whole(110, 210, 310));
    }

    #[test]
    fn recalculate_g3_half_keeps_grade3_ht() {
        let mut p = PaperProfile::default();
        p.set_grade(ContrastGrade::G3, whole(100, 200, 300));
        p.set_grade(ContrastGrade::G4, whole(120, 220, 340));
        p.recalculate();
        let mid = p.grade_at(ContrastGrade::G3Half);
        assert_eq!(mid.ht_lev100, 100);
        assert_eq!(mid.hm_lev100, 210);
        assert_eq!(mid.hs_lev100, 320);
    }

    #[test]
    fn recalculate_skips_unset_neighbors() {
        let mut p = PaperProfile::default();
        p.set_grade(ContrastGrade::G1, whole(100, 200, 300));
        p.recalculate();
        assert!(p.grade_at(ContrastGrade::G1Half).is_empty());
    }
}
