//! Light Meter (L0 contract) — spec.md §6.

use crate::error::CoreError;

/// Sensor gain steps, ordered from lowest to highest sensitivity.
/// Calibration starts at the highest gain and steps down (spec.md §4.4.1-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Gain {
    X1,
    X8,
    X16,
    X32,
    X64,
    X128,
    X256,
}

impl Gain {
    pub const MAX: Gain = Gain::X256;
    pub const MIN: Gain = Gain::X1;

    /// Step down to the next lower gain, or `None` if already at `X1`.
    pub fn step_down(self) -> Option<Gain> {
        use Gain::*;
        match self {
            X256 => Some(X128),
            X128 => Some(X64),
            X64 => Some(X32),
            X32 => Some(X16),
            X16 => Some(X8),
            X8 => Some(X1),
            X1 => None,
        }
    }
}

/// Outcome of a metering attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeterReading {
    Ok(f64),
    Low,
    High,
    Timeout,
    Fail,
}

impl MeterReading {
    pub fn lux(self) -> Option<f64> {
        match self {
            MeterReading::Ok(v) => Some(v),
            _ => None,
        }
    }
}

/// Ambient light probe contract (spec.md §6).
pub trait LightMeter: Send {
    fn enable(&mut self) -> Result<(), CoreError>;
    fn disable(&mut self) -> Result<(), CoreError>;
    fn set_gain(&mut self, gain: Gain) -> Result<(), CoreError>;
    /// `integration_us` is the integration time in microseconds; `count`
    /// is the number of samples averaged per reading.
    fn set_integration(&mut self, integration_us: u32, count: u8) -> Result<(), CoreError>;
    fn enable_agc(&mut self, count: u8) -> Result<(), CoreError>;
    /// Non-blocking: returns `None` if no reading is ready yet.
    fn try_measure(&mut self) -> Option<MeterReading>;
    /// Blocking with timeout.
    fn measure(&mut self, timeout_ms: u64) -> MeterReading;
    /// Raw clear-channel counts, used only during calibration.
    fn clear_channel_data(&mut self) -> Option<u32>;
}
