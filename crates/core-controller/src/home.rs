//! Home screen and its time-increment sub-mode — grounded on
//! `state_home`/`state_home_change_time_increment` in `state_controller.c`.

use core_hal::{DisplayGrade, Key, MainPrintingView, MeterReading};

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

fn grade_to_display(grade: core_profile::ContrastGrade) -> DisplayGrade {
    use core_profile::ContrastGrade::*;
    match grade {
        G00 => DisplayGrade::G00,
        G0 => DisplayGrade::G0,
        G0Half => DisplayGrade::G0Half,
        G1 => DisplayGrade::G1,
        G1Half => DisplayGrade::G1Half,
        G2 => DisplayGrade::G2,
        G2Half => DisplayGrade::G2Half,
        G3 => DisplayGrade::G3,
        G3Half => DisplayGrade::G3Half,
        G4 => DisplayGrade::G4,
        G4Half => DisplayGrade::G4Half,
        G5 => DisplayGrade::G5,
    }
}

/// One-shot meter-probe reading: enable the meter, take a single
/// blocking measurement, and fold it into the tone graph (spec.md §4.2,
/// §6). Shared by `HomeState` and `FocusState` — the live-readings
/// screens, as distinct from `DensitometerState`'s continuous AGC'd
/// relative-density readout.
pub(crate) fn take_meter_probe_reading(ctx: &mut ControllerContext) {
    let (ht, hs) = ctx.tone_graph_thresholds();
    let _ = ctx.meter.enable();
    if let MeterReading::Ok(lux) = ctx.meter.measure(100) {
        core_exposure::add_meter_reading(&mut ctx.exposure, lux, ht, hs);
    }
    let _ = ctx.meter.disable();
}

#[derive(Default)]
pub struct HomeState {
    change_inc_pending: bool,
    swallow_release_up: bool,
    swallow_release_down: bool,
}

impl ControllerState for HomeState {
    fn entry(&mut self, _prev: StateId, _ctx: &mut ControllerContext) {
        self.change_inc_pending = false;
        self.swallow_release_up = false;
        self.swallow_release_down = false;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let adjusted = core_exposure::exposure_time(&ctx.exposure);
        let (ht, hs) = ctx.tone_graph_thresholds();
        ctx.display.draw_main_printing(&MainPrintingView {
            tone_graph: core_exposure::tone_graph(&ctx.exposure, ht, hs),
            contrast_grade: grade_to_display(ctx.exposure.contrast_grade),
            time_seconds: adjusted as u32,
            time_milliseconds: ((adjusted.fract()) * 1000.0) as u32,
            fraction_digits: 2,
        });

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        if self.change_inc_pending {
            if event.key == Key::IncExposure && !event.pressed {
                self.swallow_release_up = false;
            } else if event.key == Key::DecExposure && !event.pressed {
                self.swallow_release_down = false;
            }
            if !self.swallow_release_up && !self.swallow_release_down {
                self.change_inc_pending = false;
                return Transition::Goto(StateId::ChangeTimeIncrement);
            }
            return Transition::Stay;
        }

        if event.is_released_or_repeated(Key::IncExposure) {
            let step = ctx.exposure.adjustment_increment.as_twelfths();
            let next = (ctx.exposure.adjustment_value + step)
                .min(core_exposure::MAX_ADJUSTMENT_VALUE);
            let _ = ctx.exposure.set_adjustment_value(next);
        } else if event.is_released_or_repeated(Key::DecExposure) {
            let step = ctx.exposure.adjustment_increment.as_twelfths();
            let next = (ctx.exposure.adjustment_value - step)
                .max(core_exposure::MIN_ADJUSTMENT_VALUE);
            let _ = ctx.exposure.set_adjustment_value(next);
        } else if event.is_released_or_repeated(Key::IncContrast) {
            if let Some(next) = ctx.exposure.contrast_grade.next() {
                ctx.exposure.contrast_grade = next;
            }
        } else if event.is_released_or_repeated(Key::DecContrast) {
            if let Some(prev) = ctx.exposure.contrast_grade.prev() {
                ctx.exposure.contrast_grade = prev;
            }
        } else if event.key == Key::Menu && !event.pressed {
            return Transition::Goto(StateId::Menu);
        } else if event.key == Key::Cancel && !event.pressed {
            ctx.exposure.clear_meter_readings();
        } else if event.key == Key::AddAdjustment && event.repeated {
            return Transition::Goto(StateId::ListAdjustments);
        } else if event.is_released_or_repeated(Key::AddAdjustment) {
            let count = ctx.exposure.burn_dodge_entries().len();
            if count < core_exposure::MAX_BURN_DODGE_ENTRIES {
                ctx.pending_edit_index = Some(count);
                return Transition::Goto(StateId::EditAdjustment);
            }
        } else if event.key == Key::MeterProbe && !event.pressed {
            take_meter_probe_reading(ctx);
        } else if event.pressed && event.key == Key::IncExposure {
            // first half of the inc+dec combo; wait for dec to also be down
            self.swallow_release_up = true;
        } else if event.pressed && event.key == Key::DecExposure && self.swallow_release_up {
            self.change_inc_pending = true;
            self.swallow_release_down = true;
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, _ctx: &mut ControllerContext) {}
}

#[derive(Default)]
pub struct ChangeTimeIncrementState;

impl ControllerState for ChangeTimeIncrementState {
    fn entry(&mut self, _prev: StateId, _ctx: &mut ControllerContext) {}

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        use core_exposure::AdjustmentIncrement::*;
        let ordered = [Twelfth, Sixth, Quarter, Third, Half, One];
        let idx = ordered
            .iter()
            .position(|i| *i == ctx.exposure.adjustment_increment)
            .unwrap_or(0);

        if event.is_released_or_repeated(Key::IncExposure) {
            if let Some(next) = ordered.get(idx + 1) {
                ctx.exposure.adjustment_increment = *next;
            }
        } else if event.is_released_or_repeated(Key::DecExposure) {
            if idx > 0 {
                ctx.exposure.adjustment_increment = ordered[idx - 1];
            }
        } else if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(StateId::Home);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, _ctx: &mut ControllerContext) {}
}
