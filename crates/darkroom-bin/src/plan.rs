//! Builds the ephemeral run plan `core_engine` consumes from the
//! session's `ExposureState`. Grounded on `state_timer_process` in
//! `state_timer.c`: the firmware runs a single continuous segment at
//! the adjusted exposure time — burn/dodge entries are bookkeeping for
//! the printer to act on by hand, never separate timed segments.

use core_exposure::ExposureState;
use core_engine::{ExposurePlan, ExposureSegment};

/// `override_ms` is set for a single test-strip patch; otherwise the
/// plan uses `exposure`'s own adjusted time.
pub fn build_plan(exposure: &ExposureState, override_ms: Option<u32>) -> ExposurePlan {
    let effective_ms = match override_ms {
        Some(ms) => ms,
        None => {
            let seconds = core_exposure::exposure_time(exposure);
            (seconds * 1000.0).round().clamp(0.0, u32::MAX as f64) as u32
        }
    };

    ExposurePlan::single(ExposureSegment {
        effective_ms,
        start_tone: 0,
        end_tone: 0,
        channel_levels: exposure.channel_levels,
        contrast_grade: exposure.contrast_grade,
    })
}
