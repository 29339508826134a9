//! Focus mode — spec.md §4.5 focus-mode timeout: entering focus starts
//! a wall-clock timer; on expiry (or Start/Cancel) the controller
//! forces a transition back to Home with the actuator off.

use std::sync::atomic::Ordering;

use core_hal::Key;

use crate::fsm::{ControllerState, StateId, Transition};
use crate::home::take_meter_probe_reading;
use crate::ControllerContext;

/// How long focus mode stays lit with no input before timing out.
pub const FOCUS_TIMEOUT_MS: u64 = 120_000;
const POLL_MS: u64 = 250;

#[derive(Default)]
pub struct FocusState {
    elapsed_ms: u64,
}

impl ControllerState for FocusState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.elapsed_ms = 0;
        ctx.focus_cancel.store(false, Ordering::Relaxed);
        let _ = ctx.actuator.set_focus();
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        if ctx.focus_cancel_requested() {
            return Transition::Goto(StateId::Home);
        }

        let Some(event) = ctx.keypad.wait_for_event(Some(POLL_MS)) else {
            self.elapsed_ms += POLL_MS;
            if self.elapsed_ms >= FOCUS_TIMEOUT_MS {
                return Transition::Goto(StateId::Home);
            }
            return Transition::Stay;
        };
        self.elapsed_ms = 0;

        match event.key {
            Key::Focus if !event.pressed => Transition::Goto(StateId::Home),
            Key::Cancel if !event.pressed => Transition::Goto(StateId::Home),
            Key::Start if !event.pressed => Transition::Goto(StateId::Timer),
            Key::MeterProbe if !event.pressed => {
                take_meter_probe_reading(ctx);
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        let _ = ctx.actuator.set_off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_exposure::{ExposureMode, ExposureState};
    use core_hal::{
        CoreError, ExposureTarget, Key, KeypadEvent, MainPrintingView, MemorySettingsStore,
        SafelightState, SystemTimeSource, TestStripView, TimerView,
    };
    use core_profile::ContrastGrade;

    struct NoEventsKeypad;
    impl core_hal::Keypad for NoEventsKeypad {
        fn wait_for_event(&mut self, _timeout_ms: Option<u64>) -> Option<KeypadEvent> {
            None
        }
    }

    #[derive(Default)]
    struct NullDisplay;
    impl core_hal::DisplaySurface for NullDisplay {
        fn draw_main_printing(&mut self, _view: &MainPrintingView) {}
        fn draw_test_strip_elements(&mut self, _view: &TestStripView) {}

        fn draw_exposure_timer(&mut self, _view: &TimerView) {}
        fn draw_mode_text(&mut self, _text: &str) {}
        fn redraw_tone_graph(&mut self, _bits: u32) {}
    }

    #[derive(Default)]
    struct NullActuator {
        enabled: bool,
    }
    impl core_hal::LightActuator for NullActuator {
        fn set_off(&mut self) -> Result<(), CoreError> {
            self.enabled = false;
            Ok(())
        }
        fn set_focus(&mut self) -> Result<(), CoreError> {
            self.enabled = true;
            Ok(())
        }
        fn set_exposure(&mut self, _target: ExposureTarget) -> Result<(), CoreError> {
            self.enabled = true;
            Ok(())
        }
        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    #[derive(Default)]
    struct NullSafelight;
    impl core_hal::SafelightController for NullSafelight {
        fn safelight_state(&mut self, _state: SafelightState) {}
        fn blackout(&mut self, _enabled: bool) {}
    }

    #[derive(Default)]
    struct NullMeter;
    impl core_hal::LightMeter for NullMeter {
        fn enable(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
        fn disable(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
        fn set_gain(&mut self, _gain: core_hal::Gain) -> Result<(), CoreError> {
            Ok(())
        }
        fn set_integration(&mut self, _integration_us: u32, _count: u8) -> Result<(), CoreError> {
            Ok(())
        }
        fn enable_agc(&mut self, _count: u8) -> Result<(), CoreError> {
            Ok(())
        }
        fn try_measure(&mut self) -> Option<core_hal::MeterReading> {
            None
        }
        fn measure(&mut self, _timeout_ms: u64) -> core_hal::MeterReading {
            core_hal::MeterReading::Timeout
        }
        fn clear_channel_data(&mut self) -> Option<u32> {
            None
        }
    }

    #[test]
    fn timeout_forces_transition_home() {
        let mut keypad = NoEventsKeypad;
        let mut display = NullDisplay;
        let mut actuator = NullActuator::default();
        let mut safelight = NullSafelight;
        let mut meter = NullMeter;
        let time = SystemTimeSource::new();
        let settings = MemorySettingsStore::default();
        let exposure = ExposureState::new(ExposureMode::PrintingBw, 10.0, ContrastGrade::G2);
        let cancel = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let mut ctx = ControllerContext::new(
            exposure,
            &mut keypad,
            &mut display,
            &mut actuator,
            &mut safelight,
            &mut meter,
            &time,
            &settings,
            cancel,
        );

        let mut state = FocusState::default();
        state.entry(StateId::Home, &mut ctx);
        assert!(ctx.actuator.is_enabled());

        let mut transition = Transition::Stay;
        for _ in 0..((FOCUS_TIMEOUT_MS / POLL_MS) + 2) {
            transition = state.process(&mut ctx);
            if transition != Transition::Stay {
                break;
            }
        }
        assert_eq!(transition, Transition::Goto(StateId::Home));

        state.exit(StateId::Home, &mut ctx);
        assert!(!ctx.actuator.is_enabled());
    }
}
