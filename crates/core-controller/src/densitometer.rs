//! Densitometer mode — grounded on `state_densitometer` in
//! `state_densitometer.c`, scoped to the in-core meter probe (the
//! original's separate USB "densistick" peripheral is out of scope:
//! nothing in the L0 contract models it).

use core_exposure::PevPreset;
use core_hal::{Gain, Key, MeterReading};

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

/// The reference this reading is measured against, per the active
/// `PevPreset`: the probed base exposure, or the last-run test-strip
/// patch's PEV. Both sides are converted through `lev100` so the two
/// presets are comparable on the same scale.
fn reference_lev100(ctx: &ControllerContext, base_lux: Option<f64>) -> Option<i32> {
    match ctx.exposure.pev_preset {
        PevPreset::Base => base_lux.and_then(core_profile::pev_from_exposure),
        PevPreset::Strip => ctx.exposure.strip_patch_lev100,
    }
}

fn relative_density_lev100(reference: Option<i32>, current: Option<f64>) -> Option<f64> {
    let reference = reference?;
    let current = current.and_then(core_profile::pev_from_exposure)?;
    Some((reference - current) as f64 / 100.0)
}

fn preset_label(preset: PevPreset) -> &'static str {
    match preset {
        PevPreset::Base => "Base",
        PevPreset::Strip => "Strip",
    }
}

pub struct DensitometerState {
    base_lux: Option<f64>,
    current_lux: Option<f64>,
}

impl Default for DensitometerState {
    fn default() -> Self {
        Self {
            base_lux: None,
            current_lux: None,
        }
    }
}

impl ControllerState for DensitometerState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.base_lux = ctx.exposure.meter_readings().iter().copied().fold(None, |acc, v| {
            if v <= 0.0 {
                acc
            } else {
                Some(acc.map_or(v, |a: f64| a.min(v)))
            }
        });
        self.current_lux = None;
        let _ = ctx.meter.enable();
        let _ = ctx.meter.set_gain(Gain::X16);
        let _ = ctx.meter.set_integration(100_000, 4);
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        if let MeterReading::Ok(lux) = ctx.meter.measure(0) {
            self.current_lux = Some(lux);
        }

        let reference = reference_lev100(ctx, self.base_lux);
        let density = relative_density_lev100(reference, self.current_lux).unwrap_or(0.0);
        ctx.display.draw_mode_text(&format!(
            "Density {density:+.2} ({})",
            preset_label(ctx.exposure.pev_preset)
        ));

        let Some(event) = ctx.keypad.wait_for_event(Some(100)) else {
            return Transition::Stay;
        };

        if event.is_released_or_repeated(Key::Start) {
            return Transition::Goto(StateId::Timer);
        } else if event.key == Key::Focus && !event.pressed {
            return Transition::Goto(StateId::Focus);
        } else if event.key == Key::Menu && !event.pressed {
            return Transition::Goto(StateId::Menu);
        } else if event.key == Key::Cancel && !event.pressed {
            self.base_lux = None;
            self.current_lux = None;
        } else if event.key == Key::MeterProbe && !event.pressed {
            if let Some(lux) = self.current_lux {
                self.base_lux = Some(lux);
            }
        } else if event.is_released_or_repeated(Key::AddAdjustment) {
            ctx.exposure.pev_preset = ctx.exposure.pev_preset.toggled();
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        let _ = ctx.meter.disable();
    }
}
