//! Exposure Execution Engine and Enlarger-profile Calibration.

mod calibration;
mod delays;
mod engine;
mod error;
mod notify;
mod plan;
mod state_machine;

pub use calibration::{CalibrationProcedure, CalibrationReport, ProfileRunSample, ReferenceStats};
pub use delays::{round_to_10, DerivedDelays, MAX_EXPOSURE_MS};
pub use engine::{EndTone, EngineConfig, ExposureEngine, RunOutcome, StartTone};
pub use error::EngineError;
pub use notify::LatestSlot;
pub use plan::{ExposurePlan, ExposureSegment};
pub use state_machine::{CallbackRate, TickEffects, TimerNotification, TimerState, TimerStateMachine};
