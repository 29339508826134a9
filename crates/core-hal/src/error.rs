//! Error kinds surfaced by the core (spec.md §7).

use thiserror::Error;

/// Unified error type for the abstract hardware contracts in this crate.
///
/// Individual higher-layer crates (`core-engine`, `core-profile`, ...)
/// define their own narrower error enums and convert into or wrap this
/// one at their boundary, the way the teacher's crates keep local
/// `thiserror` enums instead of sharing one fits-all type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid exposure: {0}")]
    InvalidExposure(String),

    #[error("profile invalid: {0}")]
    ProfileInvalid(String),

    #[error("sensor error")]
    SensorError,

    #[error("sensor saturated")]
    SensorSaturated,

    #[error("sensor reading below usable range")]
    SensorLow,

    #[error("sensor reading above usable range")]
    SensorHigh,

    #[error("reference statistics invalid: {0}")]
    ReferenceStatsInvalid(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}
