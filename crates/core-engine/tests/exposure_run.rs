//! End-to-end exposure run scenarios driven entirely by the virtual
//! clock, so they execute instantly and deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use core_engine::{
    CallbackRate, EndTone, EngineConfig, ExposureEngine, ExposurePlan, ExposureSegment,
    RunOutcome, StartTone, TimerNotification, TimerState,
};
use core_engine::LatestSlot;
use core_hal::{
    Buzzer, CoreError, ExposureTarget, LightActuator, SafelightController, SafelightState,
    VirtualTimeSource,
};
use core_profile::{ContrastGrade, EnlargerProfile};

#[derive(Default)]
struct RecordingActuator {
    enabled: bool,
    on_count: u32,
    off_count: u32,
}

impl LightActuator for RecordingActuator {
    fn set_off(&mut self) -> Result<(), CoreError> {
        self.enabled = false;
        self.off_count += 1;
        Ok(())
    }

    fn set_focus(&mut self) -> Result<(), CoreError> {
        self.enabled = true;
        Ok(())
    }

    fn set_exposure(&mut self, _target: ExposureTarget) -> Result<(), CoreError> {
        self.enabled = true;
        self.on_count += 1;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Default)]
struct RecordingBuzzer {
    running: bool,
    frequency: u16,
    volume: u8,
    start_count: u32,
}

impl Buzzer for RecordingBuzzer {
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
        self.start_count += 1;
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
struct RecordingSafelight {
    states: Vec<SafelightState>,
}

impl SafelightController for RecordingSafelight {
    fn safelight_state(&mut self, state: SafelightState) {
        self.states.push(state);
    }

    fn blackout(&mut self, _enabled: bool) {}
}

fn profile() -> EnlargerProfile {
    EnlargerProfile {
        turn_on_delay: 40,
        rise_time: 120,
        rise_time_equiv: 60,
        turn_off_delay: 20,
        fall_time: 100,
        fall_time_equiv: 50,
        contrast_filter: None,
        control: None,
    }
}

fn segment(effective_ms: u32) -> ExposureSegment {
    ExposureSegment {
        effective_ms,
        start_tone: 0,
        end_tone: 0,
        channel_levels: [0; 4],
        contrast_grade: ContrastGrade::G2,
    }
}

#[tokio::test]
async fn completes_normally_and_reaches_done() {
    let mut engine = ExposureEngine::new(
        RecordingActuator::default(),
        RecordingBuzzer::default(),
        RecordingSafelight::default(),
        VirtualTimeSource::new(),
    );
    let plan = ExposurePlan::single(segment(2000));
    let config = EngineConfig {
        callback_rate: CallbackRate::Every100Ms,
        start_tone: StartTone::None,
        end_tone: EndTone::Off,
        safelight_off_delay_ms: 0,
        post_run_settle_ms: 0,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let progress = LatestSlot::new();

    let outcome = engine
        .run(&plan, &profile(), &config, cancel, &progress)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    let (actuator, _, safelight, _) = engine.into_parts();
    assert_eq!(actuator.on_count, 1);
    assert_eq!(actuator.off_count, 1);
    assert!(!actuator.is_enabled());
    assert_eq!(safelight.states, vec![SafelightState::Exposure, SafelightState::Home]);
}

#[tokio::test]
async fn progress_notifications_show_decreasing_remaining_time() {
    let mut engine = ExposureEngine::new(
        RecordingActuator::default(),
        RecordingBuzzer::default(),
        RecordingSafelight::default(),
        VirtualTimeSource::new(),
    );
    let plan = ExposurePlan::single(segment(3000));
    let config = EngineConfig {
        callback_rate: CallbackRate::Every1Sec,
        start_tone: StartTone::None,
        end_tone: EndTone::Off,
        safelight_off_delay_ms: 0,
        post_run_settle_ms: 0,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let progress = Arc::new(LatestSlot::<TimerNotification>::new());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let progress_clone = progress.clone();
    let collector = tokio::spawn(async move {
        loop {
            let n = progress_clone.recv().await;
            let done = n.state == TimerState::End;
            seen_clone.lock().unwrap().push(n);
            if done {
                break;
            }
        }
    });

    engine
        .run(&plan, &profile(), &config, cancel, &progress)
        .await
        .unwrap();
    let _ = collector.await;

    let ticks: Vec<u32> = seen
        .lock()
        .unwrap()
        .iter()
        .filter(|n| n.state == TimerState::Tick)
        .map(|n| n.remaining_ms)
        .collect();
    for pair in ticks.windows(2) {
        assert!(pair[0] > pair[1]);
    }
}

#[tokio::test]
async fn cancellation_stops_the_lamp_and_plays_cancelled_tone() {
    let mut engine = ExposureEngine::new(
        RecordingActuator::default(),
        RecordingBuzzer::default(),
        RecordingSafelight::default(),
        VirtualTimeSource::new(),
    );
    let plan = ExposurePlan::single(segment(60_000));
    let config = EngineConfig {
        callback_rate: CallbackRate::Every1Sec,
        start_tone: StartTone::None,
        end_tone: EndTone::Regular,
        safelight_off_delay_ms: 0,
        post_run_settle_ms: 0,
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let progress = LatestSlot::new();

    cancel.store(true, Ordering::Relaxed);
    let outcome = engine
        .run(&plan, &profile(), &config, cancel, &progress)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    let (actuator, _, _, _) = engine.into_parts();
    assert!(!actuator.is_enabled());
}

#[tokio::test]
async fn invalid_relay_off_delay_is_refused() {
    let mut engine = ExposureEngine::new(
        RecordingActuator::default(),
        RecordingBuzzer::default(),
        RecordingSafelight::default(),
        VirtualTimeSource::new(),
    );
    let mut bad_profile = profile();
    bad_profile.turn_off_delay = 50_000;
    let plan = ExposurePlan::single(segment(1000));
    let config = EngineConfig {
        start_tone: StartTone::None,
        end_tone: EndTone::Off,
        safelight_off_delay_ms: 0,
        post_run_settle_ms: 0,
        ..EngineConfig::default()
    };
    let cancel = Arc::new(AtomicBool::new(false));
    let progress = LatestSlot::new();

    let result = engine
        .run(&plan, &bad_profile, &config, cancel, &progress)
        .await;
    assert!(result.is_err());
}
