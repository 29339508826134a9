//! Exposure data model and the pure calculation layer over it.

mod error;
mod model;
mod state;

pub use error::ExposureError;
pub use model::{
    add_meter_reading, exposure_time, meter_reading_tone, min_exposure_time,
    test_strip_time_complete, test_strip_time_incremental, tone_graph, tone_graph_bit,
    validate_adjusted_time,
};
pub use state::{
    AdjustmentIncrement, BurnDodgeEntry, ExposureMode, ExposureState, PevPreset, ToneGraph,
    MAX_ADJUSTED_TIME_SECONDS, MAX_ADJUSTMENT_VALUE, MAX_BURN_DODGE_ENTRIES,
    MIN_ADJUSTED_TIME_SECONDS, MIN_ADJUSTMENT_VALUE,
};
