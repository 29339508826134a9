//! Step wedge calibration target — spec.md §3.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// A photographic step wedge: a strip of `step_count` patches whose
/// nominal density increases by `density_increment` per step from
/// `base_density`. Individual steps may carry a directly `measured`
/// density that overrides the nominal formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepWedge {
    pub step_count: u8,
    pub base_density: f64,
    pub density_increment: f64,
    pub measured: Vec<Option<f64>>,
}

impl StepWedge {
    pub fn new(step_count: u8, base_density: f64, density_increment: f64) -> Self {
        Self {
            step_count,
            base_density,
            density_increment,
            measured: vec![None; step_count as usize],
        }
    }

    pub fn is_valid(&self) -> bool {
        (2..=51).contains(&self.step_count)
            && self.density_increment > 0.0
            && self.base_density >= 0.0
            && self.measured.len() == self.step_count as usize
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ProfileError::StepWedgeInvalid(
                "step wedge field out of range".into(),
            ))
        }
    }

    /// Density of step `i` (0-indexed): the `measured` override if
    /// present, otherwise `base_density + i * density_increment`.
    pub fn density(&self, i: usize) -> Option<f64> {
        if i >= self.step_count as usize {
            return None;
        }
        Some(
            self.measured
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(self.base_density + i as f64 * self.density_increment),
        )
    }

    pub fn set_measured(&mut self, i: usize, density: f64) {
        if let Some(slot) = self.measured.get_mut(i) {
            *slot = Some(density);
        }
    }
}

impl Default for StepWedge {
    fn default() -> Self {
        Self::new(21, 0.0, 0.15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wedge_is_valid() {
        assert!(StepWedge::default().is_valid());
    }

    #[test]
    fn rejects_too_few_steps() {
        let w = StepWedge::new(1, 0.0, 0.1);
        assert!(!w.is_valid());
    }

    #[test]
    fn density_follows_nominal_formula_when_unmeasured() {
        let w = StepWedge::new(5, 0.1, 0.2);
        assert!((w.density(2).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn measured_override_takes_precedence() {
        let mut w = StepWedge::new(5, 0.1, 0.2);
        w.set_measured(2, 9.9);
        assert_eq!(w.density(2), Some(9.9));
    }

    #[test]
    fn density_out_of_range_is_none() {
        let w = StepWedge::default();
        assert_eq!(w.density(100), None);
    }
}
