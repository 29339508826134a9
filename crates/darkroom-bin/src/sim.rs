//! Bench-top stand-ins for the L0 hardware contracts. Every real
//! driver (relay GPIO, DMX bus, I2C light meter, keypad matrix,
//! display panel) is an external collaborator this crate never
//! implements for production; these are only good enough to exercise
//! the core end to end from a terminal.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use tracing::info;

use core_hal::{
    Buzzer, CoreError, DisplayGrade, DisplaySurface, ExposureTarget, Gain, Key, Keypad,
    KeypadEvent, LightActuator, LightMeter, MainPrintingView, MeterReading, SafelightController,
    SafelightState, TestStripView, TimerView,
};

#[derive(Default)]
pub struct SimActuator {
    enabled: bool,
    target: Option<ExposureTarget>,
}

impl LightActuator for SimActuator {
    fn set_off(&mut self) -> Result<(), CoreError> {
        self.enabled = false;
        self.target = None;
        Ok(())
    }

    fn set_focus(&mut self) -> Result<(), CoreError> {
        self.enabled = true;
        self.target = None;
        Ok(())
    }

    fn set_exposure(&mut self, target: ExposureTarget) -> Result<(), CoreError> {
        self.enabled = true;
        self.target = Some(target);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Default)]
pub struct SimBuzzer {
    frequency: u16,
    volume: u8,
    running: bool,
}

impl Buzzer for SimBuzzer {
    fn set_frequency(&mut self, hz: u16) -> Result<(), CoreError> {
        self.frequency = hz;
        Ok(())
    }

    fn set_volume(&mut self, level: u8) -> Result<(), CoreError> {
        self.volume = level;
        Ok(())
    }

    fn start(&mut self) -> Result<(), CoreError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CoreError> {
        self.running = false;
        Ok(())
    }

    fn frequency(&self) -> u16 {
        self.frequency
    }

    fn volume(&self) -> u8 {
        self.volume
    }
}

#[derive(Default)]
pub struct SimSafelight {
    state: SafelightState,
}

impl SafelightController for SimSafelight {
    fn safelight_state(&mut self, state: SafelightState) {
        self.state = state;
        info!(?state, "safelight");
    }

    fn blackout(&mut self, enabled: bool) {
        info!(enabled, "blackout");
    }
}

/// Always reports a fixed, noiseless reading; good enough to exercise
/// the densitometer and calibration flows without a real sensor.
pub struct SimMeter {
    fixed_lux: f64,
    enabled: bool,
}

impl Default for SimMeter {
    fn default() -> Self {
        Self {
            fixed_lux: 100.0,
            enabled: false,
        }
    }
}

impl LightMeter for SimMeter {
    fn enable(&mut self) -> Result<(), CoreError> {
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), CoreError> {
        self.enabled = false;
        Ok(())
    }

    fn set_gain(&mut self, _gain: Gain) -> Result<(), CoreError> {
        Ok(())
    }

    fn set_integration(&mut self, _integration_us: u32, _count: u8) -> Result<(), CoreError> {
        Ok(())
    }

    fn enable_agc(&mut self, _count: u8) -> Result<(), CoreError> {
        Ok(())
    }

    fn try_measure(&mut self) -> Option<MeterReading> {
        self.enabled.then_some(MeterReading::Ok(self.fixed_lux))
    }

    fn measure(&mut self, _timeout_ms: u64) -> MeterReading {
        if self.enabled {
            MeterReading::Ok(self.fixed_lux)
        } else {
            MeterReading::Timeout
        }
    }

    fn clear_channel_data(&mut self) -> Option<u32> {
        Some((self.fixed_lux * 1000.0) as u32)
    }
}

/// Reads raw terminal key events and maps them onto the fixed keypad
/// layout. Arrow keys stand in for inc/dec exposure and contrast; a
/// handful of letters cover the remaining physical buttons.
///
/// A terminal reports a keystroke as one opaque event rather than a
/// press followed later by a release, so every ordinary key is
/// expanded into a press immediately followed by a release — this
/// satisfies both screens that act on the press (`TimerState`'s
/// mid-run cancel) and the majority that act on
/// `is_released_or_repeated`. The inc+dec hold combo on the home
/// screen, which needs the two keys held down together, can't be
/// triggered from this keypad.
#[derive(Default)]
pub struct SimKeypad {
    queued: std::collections::VecDeque<KeypadEvent>,
}

impl SimKeypad {
    fn map(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Up => Some(Key::IncExposure),
            KeyCode::Down => Some(Key::DecExposure),
            KeyCode::Right => Some(Key::IncContrast),
            KeyCode::Left => Some(Key::DecContrast),
            KeyCode::Enter => Some(Key::Start),
            KeyCode::Char('f') => Some(Key::Focus),
            KeyCode::Char('m') => Some(Key::Menu),
            KeyCode::Esc => Some(Key::Cancel),
            KeyCode::Char('p') => Some(Key::MeterProbe),
            KeyCode::Char('b') => Some(Key::AddAdjustment),
            KeyCode::Char(']') => Some(Key::EncoderCw),
            KeyCode::Char('[') => Some(Key::EncoderCcw),
            KeyCode::Char(' ') => Some(Key::Encoder),
            _ => None,
        }
    }
}

impl Keypad for SimKeypad {
    fn wait_for_event(&mut self, timeout_ms: Option<u64>) -> Option<KeypadEvent> {
        if let Some(queued) = self.queued.pop_front() {
            return Some(queued);
        }

        let timeout = timeout_ms.map(Duration::from_millis);
        let ready = match timeout {
            Some(d) => event::poll(d).unwrap_or(false),
            None => event::poll(Duration::from_secs(3600)).unwrap_or(false),
        };
        if !ready {
            return None;
        }
        let Ok(Event::Key(key_event)) = event::read() else {
            return None;
        };
        let key = Self::map(key_event.code)?;
        if matches!(key, Key::EncoderCw | Key::EncoderCcw) {
            return Some(KeypadEvent::encoder(key, 1));
        }

        self.queued.push_back(KeypadEvent::release(key));
        Some(KeypadEvent::press(key))
    }
}

/// Renders the same view data the real panel would draw as structured
/// log lines; actual pixel output is out of scope (spec.md §1).
#[derive(Default)]
pub struct SimDisplay;

fn grade_name(grade: DisplayGrade) -> &'static str {
    match grade {
        DisplayGrade::None => "none",
        DisplayGrade::G00 => "00",
        DisplayGrade::G0 => "0",
        DisplayGrade::G0Half => "0.5",
        DisplayGrade::G1 => "1",
        DisplayGrade::G1Half => "1.5",
        DisplayGrade::G2 => "2",
        DisplayGrade::G2Half => "2.5",
        DisplayGrade::G3 => "3",
        DisplayGrade::G3Half => "3.5",
        DisplayGrade::G4 => "4",
        DisplayGrade::G4Half => "4.5",
        DisplayGrade::G5 => "5",
    }
}

impl DisplaySurface for SimDisplay {
    fn draw_main_printing(&mut self, view: &MainPrintingView) {
        info!(
            grade = grade_name(view.contrast_grade),
            seconds = view.time_seconds,
            millis = view.time_milliseconds,
            tone_graph = format!("{:017b}", view.tone_graph),
            "draw_main_printing"
        );
    }

    fn draw_test_strip_elements(&mut self, view: &TestStripView) {
        info!(
            patch = view.current_patch,
            of = view.patch_count,
            ms = view.patch_time_ms,
            covered = format!("{:08b}", view.covered_patches),
            "draw_test_strip"
        );
    }

    fn draw_exposure_timer(&mut self, view: &TimerView) {
        info!(state = ?view.state, remaining_ms = view.remaining_ms, valid = view.valid, "draw_timer");
    }

    fn draw_mode_text(&mut self, text: &str) {
        info!(%text, "draw_mode_text");
    }

    fn redraw_tone_graph(&mut self, bits: u32) {
        info!(tone_graph = format!("{bits:017b}"), "redraw_tone_graph");
    }
}
