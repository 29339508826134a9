//! Persistent device settings — spec.md §6.

use core_profile::{ContrastGrade, EnlargerProfile, PaperProfile, StepWedge};

use crate::error::CoreError;
use crate::safelight::SafelightState;

/// Number of saved enlarger/paper slots the device exposes (spec.md §6).
pub const PROFILE_SLOTS: usize = 8;

/// Test-strip patch layout; mirrors `teststrip_patches_t` in the
/// original firmware's `settings.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStripPatches {
    Five,
    Seven,
}

impl TestStripPatches {
    /// `(min_patch, patch_count)` relative to the base exposure.
    pub fn range(self) -> (i32, u32) {
        match self {
            TestStripPatches::Five => (-2, 5),
            TestStripPatches::Seven => (-3, 7),
        }
    }
}

/// Whether each patch's exposure runs separately from zero, or
/// incrementally on top of the previously exposed strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStripMode {
    Separate,
    Incremental,
}

/// Persisted configuration the controller reads at startup and writes
/// back on change. Implementations back this with flash, a file, or
/// (in tests) memory.
pub trait SettingsStore: Send {
    fn default_exposure_time_ms(&self) -> u32;
    fn set_default_exposure_time_ms(&mut self, ms: u32) -> Result<(), CoreError>;

    fn default_contrast_grade(&self) -> ContrastGrade;
    fn set_default_contrast_grade(&mut self, grade: ContrastGrade) -> Result<(), CoreError>;

    fn default_step_size_lev100(&self) -> u32;
    fn set_default_step_size_lev100(&mut self, lev100: u32) -> Result<(), CoreError>;

    fn enlarger_profile(&self, slot: usize) -> Option<EnlargerProfile>;
    fn set_enlarger_profile(&mut self, slot: usize, profile: EnlargerProfile)
        -> Result<(), CoreError>;

    fn paper_profile(&self, slot: usize) -> Option<PaperProfile>;
    fn set_paper_profile(&mut self, slot: usize, profile: PaperProfile) -> Result<(), CoreError>;

    fn step_wedge(&self) -> StepWedge;
    fn set_step_wedge(&mut self, wedge: StepWedge) -> Result<(), CoreError>;

    fn safelight_config(&self) -> SafelightState;
    fn set_safelight_config(&mut self, state: SafelightState) -> Result<(), CoreError>;

    fn default_enlarger_index(&self) -> usize;
    fn set_default_enlarger_index(&mut self, index: usize) -> Result<(), CoreError>;

    fn default_paper_index(&self) -> usize;
    fn set_default_paper_index(&mut self, index: usize) -> Result<(), CoreError>;

    fn buzzer_volume(&self) -> u8;
    fn set_buzzer_volume(&mut self, volume: u8) -> Result<(), CoreError>;

    fn test_strip_patches(&self) -> TestStripPatches;
    fn set_test_strip_patches(&mut self, patches: TestStripPatches) -> Result<(), CoreError>;

    fn test_strip_mode(&self) -> TestStripMode;
    fn set_test_strip_mode(&mut self, mode: TestStripMode) -> Result<(), CoreError>;
}

/// In-memory reference implementation, used by tests and by
/// `darkroom-bin` when no on-disk store is configured.
#[derive(Debug, Clone)]
pub struct MemorySettingsStore {
    default_exposure_time_ms: u32,
    default_contrast_grade: ContrastGrade,
    default_step_size_lev100: u32,
    enlarger_profiles: [Option<EnlargerProfile>; PROFILE_SLOTS],
    paper_profiles: [Option<PaperProfile>; PROFILE_SLOTS],
    step_wedge: StepWedge,
    safelight_config: SafelightState,
    default_enlarger_index: usize,
    default_paper_index: usize,
    buzzer_volume: u8,
    test_strip_patches: TestStripPatches,
    test_strip_mode: TestStripMode,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self {
            default_exposure_time_ms: 10_000,
            default_contrast_grade: ContrastGrade::G2,
            default_step_size_lev100: 10,
            enlarger_profiles: Default::default(),
            paper_profiles: Default::default(),
            step_wedge: StepWedge::default(),
            safelight_config: SafelightState::default(),
            default_enlarger_index: 0,
            default_paper_index: 0,
            buzzer_volume: 50,
            test_strip_patches: TestStripPatches::Seven,
            test_strip_mode: TestStripMode::Incremental,
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn default_exposure_time_ms(&self) -> u32 {
        self.default_exposure_time_ms
    }

    fn set_default_exposure_time_ms(&mut self, ms: u32) -> Result<(), CoreError> {
        self.default_exposure_time_ms = ms;
        Ok(())
    }

    fn default_contrast_grade(&self) -> ContrastGrade {
        self.default_contrast_grade
    }

    fn set_default_contrast_grade(&mut self, grade: ContrastGrade) -> Result<(), CoreError> {
        self.default_contrast_grade = grade;
        Ok(())
    }

    fn default_step_size_lev100(&self) -> u32 {
        self.default_step_size_lev100
    }

    fn set_default_step_size_lev100(&mut self, lev100: u32) -> Result<(), CoreError> {
        self.default_step_size_lev100 = lev100;
        Ok(())
    }

    fn enlarger_profile(&self, slot: usize) -> Option<EnlargerProfile> {
        self.enlarger_profiles.get(slot).cloned().flatten()
    }

    fn set_enlarger_profile(
        &mut self,
        slot: usize,
        profile: EnlargerProfile,
    ) -> Result<(), CoreError> {
        profile
            .validate()
            .map_err(|e| CoreError::ProfileInvalid(e.to_string()))?;
        *self
            .enlarger_profiles
            .get_mut(slot)
            .ok_or_else(|| CoreError::ProfileInvalid(format!("slot {slot} out of range")))? =
            Some(profile);
        Ok(())
    }

    fn paper_profile(&self, slot: usize) -> Option<PaperProfile> {
        self.paper_profiles.get(slot).cloned().flatten()
    }

    fn set_paper_profile(&mut self, slot: usize, profile: PaperProfile) -> Result<(), CoreError> {
        profile
            .validate()
            .map_err(|e| CoreError::ProfileInvalid(e.to_string()))?;
        *self
            .paper_profiles
            .get_mut(slot)
            .ok_or_else(|| CoreError::ProfileInvalid(format!("slot {slot} out of range")))? =
            Some(profile);
        Ok(())
    }

    fn step_wedge(&self) -> StepWedge {
        self.step_wedge.clone()
    }

    fn set_step_wedge(&mut self, wedge: StepWedge) -> Result<(), CoreError> {
        wedge
            .validate()
            .map_err(|e| CoreError::ProfileInvalid(e.to_string()))?;
        self.step_wedge = wedge;
        Ok(())
    }

    fn safelight_config(&self) -> SafelightState {
        self.safelight_config
    }

    fn set_safelight_config(&mut self, state: SafelightState) -> Result<(), CoreError> {
        self.safelight_config = state;
        Ok(())
    }

    fn default_enlarger_index(&self) -> usize {
        self.default_enlarger_index
    }

    fn set_default_enlarger_index(&mut self, index: usize) -> Result<(), CoreError> {
        self.default_enlarger_index = index;
        Ok(())
    }

    fn default_paper_index(&self) -> usize {
        self.default_paper_index
    }

    fn set_default_paper_index(&mut self, index: usize) -> Result<(), CoreError> {
        self.default_paper_index = index;
        Ok(())
    }

    fn buzzer_volume(&self) -> u8 {
        self.buzzer_volume
    }

    fn set_buzzer_volume(&mut self, volume: u8) -> Result<(), CoreError> {
        self.buzzer_volume = volume.min(100);
        Ok(())
    }

    fn test_strip_patches(&self) -> TestStripPatches {
        self.test_strip_patches
    }

    fn set_test_strip_patches(&mut self, patches: TestStripPatches) -> Result<(), CoreError> {
        self.test_strip_patches = patches;
        Ok(())
    }

    fn test_strip_mode(&self) -> TestStripMode {
        self.test_strip_mode
    }

    fn set_test_strip_mode(&mut self, mode: TestStripMode) -> Result<(), CoreError> {
        self.test_strip_mode = mode;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_enlarger_profile() {
        let mut store = MemorySettingsStore::default();
        let mut bad = EnlargerProfile::default();
        bad.rise_time_equiv = bad.rise_time + 1;
        assert!(store.set_enlarger_profile(0, bad).is_err());
    }

    #[test]
    fn round_trips_a_valid_profile() {
        let mut store = MemorySettingsStore::default();
        let profile = EnlargerProfile::default();
        store.set_enlarger_profile(3, profile.clone()).unwrap();
        assert_eq!(store.enlarger_profile(3), Some(profile));
    }

    #[test]
    fn buzzer_volume_clamps_to_100() {
        let mut store = MemorySettingsStore::default();
        store.set_buzzer_volume(255).unwrap();
        assert_eq!(store.buzzer_volume(), 100);
    }
}
