//! Timer state — requests a run from the owning binary and waits for
//! its completion flag; the run itself is driven by `core_engine`
//! outside the controller (see `ControllerContext::pending_run`).

use core_hal::Key;

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

#[derive(Default)]
pub struct TimerState {
    requested: bool,
}

impl ControllerState for TimerState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.requested = false;
        ctx.last_run_completed = None;
        ctx.pending_run_override_ms = None;
        ctx.cancel.store(false, std::sync::atomic::Ordering::Relaxed);
        ctx.pending_run = true;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        if !self.requested {
            self.requested = true;
        }

        if ctx.last_run_completed.is_some() {
            return Transition::Goto(StateId::Home);
        }

        let Some(event) = ctx.keypad.wait_for_event(Some(50)) else {
            return Transition::Stay;
        };
        if event.key == Key::Cancel && event.pressed {
            ctx.cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        }
        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        ctx.pending_run = false;
    }
}
