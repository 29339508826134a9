//! Darkroom timer entrypoint — wires simulated hardware into
//! `core-controller`'s state machine and drives `core-engine`'s
//! exposure engine from the outer loop between controller steps.

mod plan;
mod sim;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use core_controller::{build_controller, ControllerContext, Transition};
use core_engine::{EngineConfig, ExposureEngine, LatestSlot};
use core_exposure::{ExposureMode, ExposureState};
use core_hal::{MemorySettingsStore, SettingsStore, SystemTimeSource};

use sim::{SimActuator, SimBuzzer, SimDisplay, SimKeypad, SimMeter, SimSafelight};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "darkroom", version, about = "Darkroom enlarging timer")]
struct Args {
    /// Directory the session log is written to.
    #[arg(long = "log-dir", default_value = ".")]
    log_dir: std::path::PathBuf,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn configure_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let log_path = log_dir.join("darkroom.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "darkroom.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "runtime.panic", ?info, "panic");
        default_panic(info);
    }));
}

/// Owns every hardware handle across controller ticks. The actuator,
/// buzzer, safelight, and time source are briefly taken out as `Option`
/// to hand ownership to `ExposureEngine` for the duration of one run
/// (`Buzzer::sequence`'s `Self: Sized` bound rules out `dyn` here),
/// then handed back via `into_parts`.
struct Hardware {
    actuator: Option<SimActuator>,
    buzzer: Option<SimBuzzer>,
    safelight: Option<SimSafelight>,
    time: Option<SystemTimeSource>,
    meter: SimMeter,
    keypad: SimKeypad,
    display: SimDisplay,
    settings: MemorySettingsStore,
}

/// Everything `ControllerContext` carries besides borrowed hardware,
/// persisted by hand across ticks since a fresh context is built every
/// iteration (see `core_controller::step_once`'s doc comment on why
/// `run_until_transition` can't be used here).
#[derive(Default)]
struct Session {
    pending_run: bool,
    pending_run_override_ms: Option<u32>,
    last_run_completed: Option<bool>,
    pending_edit_index: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_dir);
    install_panic_hook();

    info!(target: "runtime", "startup");

    let mut hw = Hardware {
        actuator: Some(SimActuator::default()),
        buzzer: Some(SimBuzzer::default()),
        safelight: Some(SimSafelight::default()),
        time: Some(SystemTimeSource::new()),
        meter: SimMeter::default(),
        keypad: SimKeypad::default(),
        display: SimDisplay,
        settings: MemorySettingsStore::default(),
    };

    let default_ms = hw.settings.default_exposure_time_ms();
    let default_grade = hw.settings.default_contrast_grade();
    let mut exposure = ExposureState::new(
        ExposureMode::PrintingBw,
        default_ms as f64 / 1000.0,
        default_grade,
    );

    let mut controller = build_controller();
    let mut session = Session::default();
    let cancel = Arc::new(AtomicBool::new(false));
    let progress = LatestSlot::new();
    let engine_config = EngineConfig::default();

    let _raw_mode = RawModeGuard::enter()?;
    info!(target: "runtime", "entering controller loop");

    loop {
        let transition = {
            let mut ctx = ControllerContext::new(
                exposure,
                &mut hw.keypad,
                &mut hw.display,
                hw.actuator.as_mut().expect("actuator on loan to engine"),
                hw.safelight.as_mut().expect("safelight on loan to engine"),
                &mut hw.meter,
                hw.time.as_ref().expect("time source on loan to engine"),
                &hw.settings,
                cancel.clone(),
            );
            ctx.pending_run = session.pending_run;
            ctx.pending_run_override_ms = session.pending_run_override_ms;
            ctx.last_run_completed = session.last_run_completed;
            ctx.pending_edit_index = session.pending_edit_index;

            let transition = controller.step_once(&mut ctx);

            session.pending_run = ctx.pending_run;
            session.pending_run_override_ms = ctx.pending_run_override_ms;
            session.last_run_completed = ctx.last_run_completed;
            session.pending_edit_index = ctx.pending_edit_index;
            exposure = ctx.exposure;
            transition
        };

        if transition == Transition::Halt {
            break;
        }

        if session.pending_run && session.last_run_completed.is_none() {
            let actuator = hw.actuator.take().expect("actuator already on loan");
            let buzzer = hw.buzzer.take().expect("buzzer already on loan");
            let safelight = hw.safelight.take().expect("safelight already on loan");
            let time = hw.time.take().expect("time source already on loan");

            let profile = hw
                .settings
                .enlarger_profile(hw.settings.default_enlarger_index())
                .unwrap_or_default();
            let plan = plan::build_plan(&exposure, session.pending_run_override_ms);

            let mut engine = ExposureEngine::new(actuator, buzzer, safelight, time);
            let outcome = engine
                .run(&plan, &profile, &engine_config, cancel.clone(), &progress)
                .await;

            let (actuator, buzzer, safelight, time) = engine.into_parts();
            hw.actuator = Some(actuator);
            hw.buzzer = Some(buzzer);
            hw.safelight = Some(safelight);
            hw.time = Some(time);

            session.last_run_completed = Some(match outcome {
                Ok(core_engine::RunOutcome::Completed) => true,
                Ok(core_engine::RunOutcome::Cancelled) => false,
                Err(err) => {
                    warn!(target: "runtime", %err, "exposure run failed");
                    false
                }
            });
        }
    }

    info!(target: "runtime", "shutdown");
    Ok(())
}
