//! Enlarger-profile calibration — spec.md §4.4, grounded on the
//! profiling sequence described in `exposure_timer.c`/`illum_controller.c`
//! and carried out against the `LightMeter`/`LightActuator` contracts.

use core_hal::{Gain, LightActuator, LightMeter, MeterReading, TimeSource};
use core_profile::EnlargerProfile;

use crate::error::EngineError;

const REFERENCE_SAMPLE_COUNT: usize = 100;
const PROFILE_RUN_COUNT: usize = 5;
const ON_SETTLE_MS: u64 = 5_000;
const OFF_SETTLE_MS: u64 = 2_000;
const POLL_INTERVAL_MS: u64 = 5;
const WATCHDOG_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

impl ReferenceStats {
    fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            min,
            max,
            stddev: variance.sqrt(),
        }
    }
}

/// One completed profiling run's raw timing measurements, kept around
/// for the caller to inspect before averaging (supplemental to
/// spec.md: the original firmware discards per-run data immediately).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRunSample {
    pub turn_on_delay: u32,
    pub rise_time: u32,
    pub rise_time_equiv: u32,
    pub turn_off_delay: u32,
    pub fall_time: u32,
    pub fall_time_equiv: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationReport {
    pub on_stats: ReferenceStats,
    pub off_stats: ReferenceStats,
    pub samples: Vec<ProfileRunSample>,
    pub profile: EnlargerProfile,
}

pub struct CalibrationProcedure<'a, A, M, T> {
    actuator: &'a mut A,
    meter: &'a mut M,
    time: &'a T,
}

impl<'a, A, M, T> CalibrationProcedure<'a, A, M, T>
where
    A: LightActuator,
    M: LightMeter,
    T: TimeSource,
{
    pub fn new(actuator: &'a mut A, meter: &'a mut M, time: &'a T) -> Self {
        Self {
            actuator,
            meter,
            time,
        }
    }

    fn warm_up(&mut self) -> Result<(), EngineError> {
        self.meter.enable().map_err(|_| EngineError::SensorError)?;
        self.meter
            .set_gain(Gain::MAX)
            .map_err(|_| EngineError::SensorError)?;
        self.meter
            .set_integration(4_800, 1)
            .map_err(|_| EngineError::SensorError)?;
        Ok(())
    }

    fn collect_clear_channel_samples(&mut self, count: usize) -> Result<Vec<f64>, EngineError> {
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            match self.meter.clear_channel_data() {
                Some(v) => samples.push(v as f64),
                None => return Err(EngineError::ZeroReading),
            }
        }
        Ok(samples)
    }

    fn step_down_until_unsaturated(&mut self) -> Result<(), EngineError> {
        let mut gain = Gain::MAX;
        loop {
            self.meter
                .set_gain(gain)
                .map_err(|_| EngineError::SensorError)?;
            if !matches!(
                self.meter.measure(1_000),
                MeterReading::High | MeterReading::Fail
            ) {
                return Ok(());
            }
            match gain.step_down() {
                Some(next) => gain = next,
                None => return Err(EngineError::SensorSaturated),
            }
        }
    }

    /// Steps 1-3: warm-up, reference on/off statistics, validation.
    fn measure_reference(&mut self) -> Result<(ReferenceStats, ReferenceStats), EngineError> {
        self.warm_up()?;

        self.actuator
            .set_exposure(core_hal::ExposureTarget::Relay)
            .map_err(|e| EngineError::Actuator(e.to_string()))?;
        self.time.sleep(ON_SETTLE_MS);
        self.step_down_until_unsaturated()?;
        let on_samples = self.collect_clear_channel_samples(REFERENCE_SAMPLE_COUNT)?;
        let on_stats = ReferenceStats::from_samples(&on_samples);

        self.actuator
            .set_off()
            .map_err(|e| EngineError::Actuator(e.to_string()))?;
        self.time.sleep(OFF_SETTLE_MS);
        let off_samples = self.collect_clear_channel_samples(REFERENCE_SAMPLE_COUNT)?;
        let off_stats = ReferenceStats::from_samples(&off_samples);

        if on_stats.min <= off_stats.max
            || on_stats.min - off_stats.max < 10.0
            || on_stats.mean - off_stats.mean < 20.0
        {
            return Err(EngineError::InvalidReferenceStats(format!(
                "on.min={} off.max={} on.mean={} off.mean={}",
                on_stats.min, off_stats.max, on_stats.mean, off_stats.mean
            )));
        }

        Ok((on_stats, off_stats))
    }

    /// Step 4: one rise/fall timing run.
    fn profile_run(
        &mut self,
        on_stats: ReferenceStats,
        off_stats: ReferenceStats,
    ) -> Result<ProfileRunSample, EngineError> {
        let rising_threshold = off_stats.max.max(2.0);
        let rise_target = on_stats.mean - on_stats.stddev;
        let fall_target = (off_stats.mean + off_stats.stddev).max(2.0);

        self.actuator
            .set_exposure(core_hal::ExposureTarget::Relay)
            .map_err(|e| EngineError::Actuator(e.to_string()))?;

        // Each phase gets its own watchdog budget (`phase_elapsed`, reset
        // at every phase boundary); `elapsed` keeps running across all
        // four phases since the timing fields are deltas against it.
        let mut elapsed = 0u32;
        let mut phase_elapsed = 0u32;
        while self.poll_clear_channel()? <= rising_threshold {
            self.tick_poll(&mut elapsed, &mut phase_elapsed)?;
        }
        let turn_on_delay = elapsed;

        phase_elapsed = 0;
        let mut integral = 0f64;
        let mut sample_count = 0u32;
        loop {
            let v = self.poll_clear_channel()?;
            integral += v;
            sample_count += 1;
            if v >= rise_target {
                break;
            }
            self.tick_poll(&mut elapsed, &mut phase_elapsed)?;
        }
        let rise_time = elapsed - turn_on_delay;
        let rise_time_equiv = if on_stats.mean > 0.0 && sample_count > 0 {
            ((integral / (on_stats.mean * sample_count as f64)) * rise_time as f64) as u32
        } else {
            0
        };

        self.time.sleep(ON_SETTLE_MS);
        self.actuator
            .set_off()
            .map_err(|e| EngineError::Actuator(e.to_string()))?;

        phase_elapsed = 0;
        let fall_start = elapsed;
        while self.poll_clear_channel()? >= on_stats.min {
            self.tick_poll(&mut elapsed, &mut phase_elapsed)?;
        }
        let turn_off_delay = elapsed - fall_start;

        phase_elapsed = 0;
        let fall_begin = elapsed;
        let mut fall_integral = 0f64;
        let mut fall_samples = 0u32;
        loop {
            let v = self.poll_clear_channel()?;
            fall_integral += v;
            fall_samples += 1;
            if v < fall_target {
                break;
            }
            self.tick_poll(&mut elapsed, &mut phase_elapsed)?;
        }
        let fall_time = elapsed - fall_begin;
        let fall_time_equiv = if off_stats.mean > 0.0 && fall_samples > 0 {
            ((fall_integral / (off_stats.mean * fall_samples as f64)) * fall_time as f64) as u32
        } else {
            0
        };

        Ok(ProfileRunSample {
            turn_on_delay,
            rise_time,
            rise_time_equiv,
            turn_off_delay,
            fall_time,
            fall_time_equiv,
        })
    }

    fn poll_clear_channel(&mut self) -> Result<f64, EngineError> {
        self.meter
            .clear_channel_data()
            .map(|v| v as f64)
            .ok_or(EngineError::ZeroReading)
    }

    /// Advances both the cumulative `elapsed` counter and the
    /// per-phase `phase_elapsed` watchdog counter; callers reset
    /// `phase_elapsed` to `0` at each phase boundary so the 10 s budget
    /// (spec.md §4.4 step 4) applies separately to each phase rather
    /// than to the whole run.
    fn tick_poll(&mut self, elapsed: &mut u32, phase_elapsed: &mut u32) -> Result<(), EngineError> {
        self.time.sleep(POLL_INTERVAL_MS);
        *elapsed += POLL_INTERVAL_MS as u32;
        *phase_elapsed += POLL_INTERVAL_MS as u32;
        if *phase_elapsed as u64 > WATCHDOG_MS {
            return Err(EngineError::CalibrationFailed(
                "profiling phase exceeded watchdog".into(),
            ));
        }
        Ok(())
    }

    /// Run the full calibration sequence (steps 1-5) and return the
    /// averaged profile plus the per-run samples and reference stats.
    pub fn run(&mut self) -> Result<CalibrationReport, EngineError> {
        let (on_stats, off_stats) = self.measure_reference()?;

        let mut samples = Vec::with_capacity(PROFILE_RUN_COUNT);
        for _ in 0..PROFILE_RUN_COUNT {
            samples.push(self.profile_run(on_stats, off_stats)?);
        }

        let average = |f: fn(&ProfileRunSample) -> u32| -> u32 {
            (samples.iter().map(|s| f(s) as u64).sum::<u64>() / samples.len() as u64) as u32
        };

        let profile = EnlargerProfile {
            turn_on_delay: average(|s| s.turn_on_delay),
            rise_time: average(|s| s.rise_time),
            rise_time_equiv: average(|s| s.rise_time_equiv),
            turn_off_delay: average(|s| s.turn_off_delay),
            fall_time: average(|s| s.fall_time),
            fall_time_equiv: average(|s| s.fall_time_equiv),
            contrast_filter: None,
            control: None,
        };

        Ok(CalibrationReport {
            on_stats,
            off_stats,
            samples,
            profile,
        })
    }
}
