//! Change-mode and fine/absolute adjustment overlays on the Home
//! screen — grounded on `state_home_change_mode`,
//! `state_home_adjust_fine`, and `state_home_adjust_absolute` in
//! `state_home.c`.

use core_exposure::{ExposureMode, MAX_ADJUSTMENT_VALUE, MIN_ADJUSTMENT_VALUE};
use core_hal::Key;

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

fn mode_label(mode: ExposureMode) -> &'static str {
    match mode {
        ExposureMode::PrintingBw => "B&W Printing",
        ExposureMode::PrintingColor => "Color Printing",
        ExposureMode::Densitometer => "Densitometer",
        ExposureMode::Calibration => "Calibration",
    }
}

/// Cycles the three modes the mode-cycle UI actually offers.
/// `Calibration` is a separate elevated-priority task that preempts the
/// UI (spec.md §5), not a state this screen can select into, so it is
/// never a `mode_next`/`mode_prev` destination; a stored mode of
/// `Calibration` (which can only arrive via the settings store) cycles
/// straight to `PrintingBw`.
fn mode_next(mode: ExposureMode) -> ExposureMode {
    match mode {
        ExposureMode::PrintingBw => ExposureMode::PrintingColor,
        ExposureMode::PrintingColor => ExposureMode::Densitometer,
        ExposureMode::Densitometer | ExposureMode::Calibration => ExposureMode::PrintingBw,
    }
}

fn mode_prev(mode: ExposureMode) -> ExposureMode {
    match mode {
        ExposureMode::Densitometer => ExposureMode::PrintingColor,
        ExposureMode::PrintingColor => ExposureMode::PrintingBw,
        ExposureMode::PrintingBw | ExposureMode::Calibration => ExposureMode::Densitometer,
    }
}

pub struct ChangeModeState {
    prev: StateId,
    working: ExposureMode,
    accepted: bool,
}

impl Default for ChangeModeState {
    fn default() -> Self {
        Self {
            prev: StateId::Home,
            working: ExposureMode::PrintingBw,
            accepted: false,
        }
    }
}

impl ControllerState for ChangeModeState {
    fn entry(&mut self, prev: StateId, ctx: &mut ControllerContext) {
        self.prev = prev;
        self.working = if prev == StateId::Densitometer {
            ExposureMode::Densitometer
        } else {
            ctx.exposure.mode
        };
        self.accepted = false;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        ctx.display.draw_mode_text(mode_label(self.working));

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        if event.is_released_or_repeated(Key::IncContrast) {
            self.working = mode_next(self.working);
        } else if event.is_released_or_repeated(Key::DecContrast) {
            self.working = mode_prev(self.working);
        } else if event.key == Key::Menu && !event.pressed {
            self.accepted = true;
            return if self.working == ExposureMode::Densitometer {
                Transition::Goto(StateId::Densitometer)
            } else {
                Transition::Goto(StateId::Home)
            };
        } else if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(self.prev);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        if self.accepted && self.working != ExposureMode::Densitometer {
            ctx.exposure.mode = self.working;
        }
    }
}

pub struct AdjustFineState {
    working: i32,
    accepted: bool,
}

impl Default for AdjustFineState {
    fn default() -> Self {
        Self {
            working: 0,
            accepted: false,
        }
    }
}

impl ControllerState for AdjustFineState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.working = ctx.exposure.adjustment_value;
        self.accepted = false;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let (ht, hs) = ctx.tone_graph_thresholds();
        let tone_graph = {
            let mut probe = ctx.exposure.clone();
            let _ = probe.set_adjustment_value(self.working);
            core_exposure::tone_graph(&probe, ht, hs)
        };
        ctx.display.redraw_tone_graph(tone_graph);

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        if event.key == Key::EncoderCw {
            self.working = (self.working + event.count as i32).min(MAX_ADJUSTMENT_VALUE);
        } else if event.key == Key::EncoderCcw {
            self.working = (self.working - event.count as i32).max(MIN_ADJUSTMENT_VALUE);
        } else if event.is_released_or_repeated(Key::Encoder) {
            self.accepted = true;
            return Transition::Goto(StateId::Home);
        } else if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(StateId::Home);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        if self.accepted {
            let _ = ctx.exposure.set_adjustment_value(self.working);
        }
    }
}

/// The three-tier coarseness used by both the absolute-time encoder
/// and the `IncExposure`/`DecExposure` nudge keys in `state_home_adjust_absolute`.
fn step_for(working_ms: u32) -> u32 {
    if working_ms < 10_000 {
        100
    } else if working_ms < 100_000 {
        1_000
    } else {
        10_000
    }
}

fn encoder_step_for(working_ms: u32) -> u32 {
    if working_ms < 10_000 {
        10
    } else if working_ms < 100_000 {
        100
    } else {
        1_000
    }
}

pub struct AdjustAbsoluteState {
    working_ms: u32,
    accepted: bool,
}

impl Default for AdjustAbsoluteState {
    fn default() -> Self {
        Self {
            working_ms: 10_000,
            accepted: false,
        }
    }
}

impl ControllerState for AdjustAbsoluteState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        let seconds = core_exposure::exposure_time(&ctx.exposure);
        self.working_ms = (seconds * 1000.0).round().clamp(10.0, 999_000.0) as u32;
        self.accepted = false;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        ctx.display.draw_exposure_timer(&core_hal::TimerView {
            state: core_hal::TimerDisplayState::Pending,
            remaining_ms: self.working_ms,
            valid: true,
        });

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        if event.key == Key::EncoderCw {
            for _ in 0..event.count {
                let step = encoder_step_for(self.working_ms);
                self.working_ms = (self.working_ms + step).min(999_000);
            }
        } else if event.key == Key::EncoderCcw {
            for _ in 0..event.count {
                let step = encoder_step_for(self.working_ms.saturating_sub(1));
                self.working_ms = self.working_ms.saturating_sub(step).max(10);
            }
        } else if event.is_released_or_repeated(Key::IncExposure) {
            let step = step_for(self.working_ms);
            self.working_ms = (self.working_ms + step).min(999_000);
        } else if event.is_released_or_repeated(Key::DecExposure) {
            let step = step_for(self.working_ms.saturating_sub(1));
            self.working_ms = self.working_ms.saturating_sub(step).max(10);
        } else if event.is_released_or_repeated(Key::Encoder) {
            self.accepted = true;
            return Transition::Goto(StateId::Home);
        } else if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(StateId::Home);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        if self.accepted {
            ctx.exposure.base_time = self.working_ms as f64 / 1000.0;
            ctx.exposure.adjustment_value = 0;
        }
    }
}
