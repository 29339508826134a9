//! Hardware abstraction contracts — the L0 layer (spec.md §6).
//!
//! Every trait here is an "abstract contract": the real implementation
//! (relay GPIO, DMX bus, I2C light meter, USB mass storage, ...) is out
//! of scope and lives in a firmware binary this crate never sees.
//! `darkroom-bin` wires in simulated implementations for local use and
//! for the end-to-end tests in `core-engine`.

pub mod actuator;
pub mod buzzer;
pub mod display;
pub mod error;
pub mod keypad;
pub mod meter;
pub mod profile_storage;
pub mod safelight;
pub mod settings;
pub mod time;

pub use actuator::{DmxActuator, DmxBus, ExposureTarget, GpioPin, LightActuator, RelayActuator};
pub use buzzer::{Buzzer, BuzzerSequence};
pub use display::{
    DisplayGrade, DisplaySurface, MainPrintingView, TestStripView, TimerDisplayState, TimerView,
};
pub use error::CoreError;
pub use keypad::{Key, Keypad, KeypadEvent};
pub use meter::{Gain, LightMeter, MeterReading};
pub use profile_storage::{ProfileStorage, VersionedRecord, PROFILE_RECORD_VERSION};
pub use safelight::{SafelightController, SafelightState};
pub use settings::{
    MemorySettingsStore, SettingsStore, TestStripMode, TestStripPatches, PROFILE_SLOTS,
};
pub use time::{SystemTimeSource, TimeSource, VirtualTimeSource};
