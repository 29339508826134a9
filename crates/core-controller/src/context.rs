//! Shared mutable context threaded through every controller state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use core_exposure::ExposureState;
use core_hal::{
    DisplaySurface, Keypad, LightActuator, LightMeter, SafelightController, SettingsStore,
    TimeSource,
};
use core_keypad::ActionRegistry;

pub struct ControllerContext<'a> {
    pub exposure: ExposureState,
    pub actions: ActionRegistry,
    pub keypad: &'a mut dyn Keypad,
    pub display: &'a mut dyn DisplaySurface,
    pub actuator: &'a mut dyn LightActuator,
    pub safelight: &'a mut dyn SafelightController,
    pub meter: &'a mut dyn LightMeter,
    pub time: &'a dyn TimeSource,
    pub settings: &'a dyn SettingsStore,
    pub focus_cancel: Arc<AtomicBool>,
    /// The same `Arc<AtomicBool>` the owning binary hands to
    /// `core_engine::ExposureEngine::run` for the duration of a run.
    /// `TimerState` stores `true` here on a mid-run Cancel press; the
    /// engine polls it every tick. Owned by the binary and passed into
    /// `new` rather than created fresh, so the flag set on one tick is
    /// still live on the next.
    pub cancel: Arc<AtomicBool>,
    /// Set by `TimerState` (or `TestStripState`) on entry; the binary's
    /// outer loop observes this between controller steps and, if set,
    /// builds an `ExposurePlan` and drives `core_engine`'s
    /// `ExposureEngine` — the engine needs owned hardware handles (for
    /// `Buzzer::sequence`'s `Self: Sized` bound) that this context's
    /// borrowed trait objects can't provide directly.
    pub pending_run: bool,
    /// When set alongside `pending_run`, the outer loop exposes for
    /// exactly this duration instead of `exposure`'s adjusted time —
    /// used by the test-strip sequencer to run one patch at a time.
    pub pending_run_override_ms: Option<u32>,
    pub last_run_completed: Option<bool>,
    /// Burn/dodge slot the next `EditAdjustmentState::entry` should
    /// load; set by whichever state transitions into it.
    pub pending_edit_index: Option<usize>,
}

impl<'a> ControllerContext<'a> {
    pub fn new(
        exposure: ExposureState,
        keypad: &'a mut dyn Keypad,
        display: &'a mut dyn DisplaySurface,
        actuator: &'a mut dyn LightActuator,
        safelight: &'a mut dyn SafelightController,
        meter: &'a mut dyn LightMeter,
        time: &'a dyn TimeSource,
        settings: &'a dyn SettingsStore,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            exposure,
            actions: ActionRegistry::new(),
            keypad,
            display,
            actuator,
            safelight,
            meter,
            time,
            settings,
            focus_cancel: Arc::new(AtomicBool::new(false)),
            cancel,
            pending_run: false,
            pending_run_override_ms: None,
            last_run_completed: None,
            pending_edit_index: None,
        }
    }

    pub fn request_focus_cancel(&self) {
        self.focus_cancel.store(true, Ordering::Relaxed);
    }

    pub fn focus_cancel_requested(&self) -> bool {
        self.focus_cancel.load(Ordering::Relaxed)
    }

    /// `(Ht, Hs)` lev100 thresholds for the active paper profile slot and
    /// contrast grade, the inputs `tone_graph`/`tone_graph_bit` bin
    /// readings against (spec.md §4.2). Falls back to `(0, 1500)` when no
    /// paper profile is stored in the active slot, or the grade entry is
    /// unset, rather than failing the draw.
    pub fn tone_graph_thresholds(&self) -> (u32, u32) {
        const FALLBACK: (u32, u32) = (0, 1500);
        let Some(profile) = self.settings.paper_profile(self.exposure.paper_profile_index) else {
            return FALLBACK;
        };
        let grade = profile.grade[self.exposure.contrast_grade.index()];
        if grade.is_empty() {
            FALLBACK
        } else {
            (grade.ht_lev100, grade.hs_lev100)
        }
    }
}
