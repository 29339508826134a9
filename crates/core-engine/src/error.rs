use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("exposure timer not configured")]
    NotConfigured,

    #[error("exposure time too long: {requested_ms}ms > {max_ms}ms")]
    ExposureTooLong { requested_ms: u32, max_ms: u32 },

    #[error("relay off delay cannot be longer than the exposure time: {relay_off_delay_ms}ms >= {requested_ms}ms")]
    RelayOffDelayTooLong {
        relay_off_delay_ms: u32,
        requested_ms: u32,
    },

    #[error("actuator error: {0}")]
    Actuator(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("sensor error")]
    SensorError,

    #[error("zero reading from light meter")]
    ZeroReading,

    #[error("sensor saturated")]
    SensorSaturated,

    #[error("invalid reference statistics: {0}")]
    InvalidReferenceStats(String),

    #[error("calibration failed: {0}")]
    CalibrationFailed(String),
}
