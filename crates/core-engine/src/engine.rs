//! Exposure Execution Engine — spec.md §4.3, grounded on
//! `exposure_timer_run`/`exposure_timer_notify` in `exposure_timer.c`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use core_hal::{Buzzer, BuzzerSequence, ExposureTarget, LightActuator, SafelightController, SafelightState, TimeSource};
use core_profile::EnlargerProfile;

use crate::delays::DerivedDelays;
use crate::error::EngineError;
use crate::notify::LatestSlot;
use crate::plan::{ExposurePlan, ExposureSegment};
use crate::state_machine::{CallbackRate, TimerNotification, TimerStateMachine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTone {
    None,
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTone {
    Off,
    Short,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub callback_rate: CallbackRate,
    pub start_tone: StartTone,
    pub end_tone: EndTone,
    /// Fixed delay after the safelight goes to `Exposure` before the
    /// actuator is asserted (spec.md §4.3.4), caller-supplied.
    pub safelight_off_delay_ms: u64,
    /// Delay after the completion tone before the run returns, mirroring
    /// the trailing `osDelay(pdMS_TO_TICKS(500))` in `exposure_timer_run`.
    pub post_run_settle_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            callback_rate: CallbackRate::Every100Ms,
            start_tone: StartTone::Countdown,
            end_tone: EndTone::Regular,
            safelight_off_delay_ms: 200,
            post_run_settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

const TICK_MS: u64 = 10;

pub struct ExposureEngine<A, Z, S, T> {
    actuator: A,
    buzzer: Z,
    safelight: S,
    time: T,
}

impl<A, Z, S, T> ExposureEngine<A, Z, S, T>
where
    A: LightActuator,
    Z: Buzzer,
    S: SafelightController,
    T: TimeSource,
{
    pub fn new(actuator: A, buzzer: Z, safelight: S, time: T) -> Self {
        Self {
            actuator,
            buzzer,
            safelight,
            time,
        }
    }

    pub fn into_parts(self) -> (A, Z, S, T) {
        (self.actuator, self.buzzer, self.safelight, self.time)
    }

    fn target_for(segment: &ExposureSegment) -> ExposureTarget {
        if segment.channel_levels.iter().any(|&v| v > 0) {
            ExposureTarget::Channels(segment.channel_levels)
        } else {
            ExposureTarget::Relay
        }
    }

    fn sleep_sync(&self, ms: u64) {
        self.time.sleep(ms);
    }

    /// Run an entire plan (one or more segments, e.g. burn/dodge) to
    /// completion, publishing progress to `progress` and honouring
    /// `cancel` at every tick.
    pub async fn run(
        &mut self,
        plan: &ExposurePlan,
        profile: &EnlargerProfile,
        config: &EngineConfig,
        cancel: Arc<AtomicBool>,
        progress: &LatestSlot<TimerNotification>,
    ) -> Result<RunOutcome, EngineError> {
        let saved_volume = self.buzzer.volume();
        let saved_frequency = self.buzzer.frequency();

        if config.start_tone == StartTone::Countdown {
            let time = &self.time;
            self.buzzer
                .sequence(BuzzerSequence::StartCountdown, |ms| time.sleep(ms));
        }

        self.safelight.safelight_state(SafelightState::Exposure);
        self.sleep_sync(config.safelight_off_delay_ms);

        info!(segments = plan.segments.len(), "exposure run starting");

        let mut cancelled = false;
        for segment in &plan.segments {
            let delays = DerivedDelays::derive(segment.effective_ms, profile);
            delays.validate()?;

            let target = Self::target_for(segment);
            let mut machine = TimerStateMachine::new(delays, config.callback_rate);

            loop {
                let is_cancelled = cancel.load(Ordering::Relaxed);
                let effects = machine.tick(is_cancelled);

                if let Some(on) = effects.set_actuator {
                    if on {
                        self.actuator
                            .set_exposure(target)
                            .map_err(|e| EngineError::Actuator(e.to_string()))?;
                    } else {
                        self.actuator
                            .set_off()
                            .map_err(|e| EngineError::Actuator(e.to_string()))?;
                    }
                }

                if let Some(on) = effects.set_buzzer {
                    if on {
                        let _ = self.buzzer.start();
                    } else {
                        let _ = self.buzzer.stop();
                    }
                }

                if let Some(notification) = effects.notify {
                    debug!(?notification, "tick notification");
                    progress.publish(notification);
                }

                if is_cancelled {
                    cancelled = true;
                }

                if machine.is_done() {
                    break;
                }

                self.time.sleep(TICK_MS);
            }

            if cancelled {
                break;
            }
        }

        self.safelight.safelight_state(SafelightState::Home);

        let time = &self.time;
        if cancelled {
            self.buzzer
                .sequence(BuzzerSequence::Cancelled, |ms| time.sleep(ms));
        } else {
            match config.end_tone {
                EndTone::Off => {}
                EndTone::Short => self
                    .buzzer
                    .sequence(BuzzerSequence::EndShort, |ms| time.sleep(ms)),
                EndTone::Regular => self
                    .buzzer
                    .sequence(BuzzerSequence::EndRegular, |ms| time.sleep(ms)),
            }
        }

        self.sleep_sync(config.post_run_settle_ms);

        let _ = self.buzzer.set_volume(saved_volume);
        let _ = self.buzzer.set_frequency(saved_frequency);

        Ok(if cancelled {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        })
    }
}
