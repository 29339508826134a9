//! Test-strip sequencer — grounded on `state_test_strip` in
//! `state_test_strip.c`: walks a fixed set of patches (5 or 7,
//! configurable) either exposing each one separately from zero or
//! incrementally covering more of the strip each time, driving one
//! `core_engine` run per patch via `ControllerContext::pending_run`.

use core_hal::{TestStripMode, TestStripView};

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

/// `round_to_10` + the 1,000,000 ms ceiling from `rounded_exposure_time_ms`
/// in `util.c`.
fn rounded_exposure_time_ms(seconds: f64) -> u32 {
    let ms = (seconds * 1000.0).round().clamp(0.0, 1_000_000.0) as u32;
    let a = (ms / 10) * 10;
    let b = a + 10;
    if ms - a > b - ms {
        b
    } else {
        a
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Selecting,
    AwaitingRun,
}

pub struct TestStripState {
    phase: Phase,
    patches_covered: u32,
    patch_min: i32,
    patch_count: u32,
    mode: TestStripMode,
}

impl Default for TestStripState {
    fn default() -> Self {
        Self {
            phase: Phase::Selecting,
            patches_covered: 0,
            patch_min: -3,
            patch_count: 7,
            mode: TestStripMode::Incremental,
        }
    }
}

impl TestStripState {
    fn patch_time_seconds(&self, ctx: &ControllerContext) -> f64 {
        match self.mode {
            TestStripMode::Separate => core_exposure::test_strip_time_complete(
                &ctx.exposure,
                self.patch_min + self.patches_covered as i32,
            ),
            TestStripMode::Incremental => core_exposure::test_strip_time_incremental(
                &ctx.exposure,
                self.patch_min,
                self.patches_covered,
            ),
        }
    }

    fn covered_mask(&self) -> u8 {
        match self.mode {
            TestStripMode::Separate => {
                0xFFu8 ^ (1 << (self.patch_count - self.patches_covered - 1))
            }
            TestStripMode::Incremental => {
                let mut mask = 0u8;
                for i in 0..self.patches_covered {
                    mask |= 1 << (self.patch_count - i - 1);
                }
                mask
            }
        }
    }
}

impl ControllerState for TestStripState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        let (patch_min, patch_count) = ctx.settings.test_strip_patches().range();
        self.patch_min = patch_min;
        self.patch_count = patch_count;
        self.mode = ctx.settings.test_strip_mode();
        self.patches_covered = 0;
        self.phase = Phase::Selecting;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        match self.phase {
            Phase::Selecting => {
                if self.patches_covered >= self.patch_count {
                    return Transition::Goto(StateId::Home);
                }

                let patch_time_ms = rounded_exposure_time_ms(self.patch_time_seconds(ctx));
                ctx.display.draw_test_strip_elements(&TestStripView {
                    patch_count: self.patch_count as u8,
                    current_patch: self.patches_covered as u8,
                    patch_time_ms,
                    covered_patches: self.covered_mask(),
                });

                let Some(event) = ctx.keypad.wait_for_event(None) else {
                    return Transition::Stay;
                };

                if event.is_released_or_repeated(core_hal::Key::Start) {
                    if self.patches_covered == 0 {
                        ctx.safelight.safelight_state(core_hal::SafelightState::Exposure);
                    }
                    let complete_seconds = core_exposure::test_strip_time_complete(
                        &ctx.exposure,
                        self.patch_min + self.patches_covered as i32,
                    );
                    ctx.exposure.strip_patch_lev100 = core_profile::pev_from_exposure(complete_seconds);
                    ctx.pending_run_override_ms = Some(patch_time_ms);
                    ctx.last_run_completed = None;
                    ctx.pending_run = true;
                    self.phase = Phase::AwaitingRun;
                } else if event.key == core_hal::Key::Cancel && !event.pressed {
                    return Transition::Goto(StateId::Home);
                }
                Transition::Stay
            }
            Phase::AwaitingRun => {
                let Some(completed) = ctx.last_run_completed else {
                    return Transition::Stay;
                };
                ctx.pending_run_override_ms = None;
                if completed {
                    self.patches_covered = (self.patches_covered + 1).min(self.patch_count);
                    self.phase = Phase::Selecting;
                    if self.patches_covered == self.patch_count {
                        Transition::Goto(StateId::Home)
                    } else {
                        Transition::Stay
                    }
                } else {
                    Transition::Goto(StateId::Home)
                }
            }
        }
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        ctx.safelight.safelight_state(core_hal::SafelightState::Home);
        ctx.pending_run = false;
        ctx.pending_run_override_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_exposure::{ExposureMode, ExposureState};
    use core_profile::ContrastGrade;

    #[test]
    fn rounded_exposure_time_ms_matches_round_half_up_to_10() {
        assert_eq!(rounded_exposure_time_ms(1.2345), 1230);
        assert_eq!(rounded_exposure_time_ms(0.005), 0);
    }

    #[test]
    fn incremental_covered_mask_grows_from_the_high_bit() {
        let mut state = TestStripState {
            phase: Phase::Selecting,
            patches_covered: 2,
            patch_min: -3,
            patch_count: 7,
            mode: TestStripMode::Incremental,
        };
        assert_eq!(state.covered_mask(), 0b1100_0000);
        state.patches_covered = 0;
        assert_eq!(state.covered_mask(), 0);
    }

    #[test]
    fn separate_covered_mask_marks_only_the_current_patch() {
        let state = TestStripState {
            phase: Phase::Selecting,
            patches_covered: 1,
            patch_min: -3,
            patch_count: 7,
            mode: TestStripMode::Separate,
        };
        assert_eq!(state.covered_mask(), 0xFF ^ (1 << (7 - 1 - 1)));
    }

    #[test]
    fn incremental_and_separate_agree_on_the_first_patch() {
        let exposure = ExposureState::new(ExposureMode::PrintingBw, 10.0, ContrastGrade::G2);
        let incremental = core_exposure::test_strip_time_incremental(&exposure, -3, 0);
        let complete = core_exposure::test_strip_time_complete(&exposure, -3);
        assert!((incremental - complete).abs() < 1e-9);
    }
}
