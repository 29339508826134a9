//! Top-level state machine — spec.md §4.5, grounded on the
//! `state_controller_loop` dispatch table in `state_controller.c`, with
//! the `entry/process/exit` contract the spec calls out explicitly
//! (the original source only has a bare `process`-equivalent).

use std::collections::HashMap;

use tracing::info;

use crate::context::ControllerContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Home,
    Timer,
    Focus,
    TestStrip,
    EditAdjustment,
    ListAdjustments,
    Menu,
    Densitometer,
    ChangeTimeIncrement,
    ChangeMode,
    AdjustFine,
    AdjustAbsolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Goto(StateId),
    /// The controller loop itself should stop (used by tests and by a
    /// clean shutdown request; the firmware's own loop never exits).
    Halt,
}

/// One top-level screen/mode. `process` is called repeatedly until it
/// returns something other than `Transition::Stay`.
pub trait ControllerState {
    fn entry(&mut self, prev: StateId, ctx: &mut ControllerContext);
    fn process(&mut self, ctx: &mut ControllerContext) -> Transition;
    fn exit(&mut self, next: StateId, ctx: &mut ControllerContext);
}

pub struct StateController {
    states: HashMap<StateId, Box<dyn ControllerState>>,
    current: StateId,
}

impl StateController {
    pub fn new(initial: StateId) -> Self {
        Self {
            states: HashMap::new(),
            current: initial,
        }
    }

    pub fn register(&mut self, id: StateId, state: Box<dyn ControllerState>) {
        self.states.insert(id, state);
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    /// Call `process` on the current state exactly once, performing the
    /// `exit`/`entry` handoff if it returns `Goto`. Callers that need to
    /// observe context mutated mid-`process` (e.g. `pending_run` set
    /// before a transition fires) must use this instead of
    /// `run_until_transition`, which hides those intermediate calls.
    pub fn step_once(&mut self, ctx: &mut ControllerContext) -> Transition {
        let state = self
            .states
            .get_mut(&self.current)
            .expect("no ControllerState registered for current StateId");

        match state.process(ctx) {
            Transition::Stay => Transition::Stay,
            Transition::Halt => Transition::Halt,
            Transition::Goto(next) => {
                let prev = self.current;
                info!(?prev, ?next, "state transition");
                state.exit(next, ctx);
                let next_state = self
                    .states
                    .get_mut(&next)
                    .expect("no ControllerState registered for destination StateId");
                next_state.entry(prev, ctx);
                self.current = next;
                Transition::Goto(next)
            }
        }
    }

    /// Run `entry` for the initial state, then loop `step_once` until a
    /// transition to a different state occurs or `Halt` is returned;
    /// this single call is one pass of `state_controller_loop`'s body
    /// for the currently active state.
    pub fn run_until_transition(&mut self, ctx: &mut ControllerContext) -> bool {
        loop {
            match self.step_once(ctx) {
                Transition::Stay => continue,
                Transition::Halt => return false,
                Transition::Goto(_) => return true,
            }
        }
    }

    /// Drive the controller forever (or until `Halt`); callers in a
    /// binary crate wrap this in their own task/thread.
    pub fn run_forever(&mut self, ctx: &mut ControllerContext) {
        {
            let initial = self.current;
            if let Some(state) = self.states.get_mut(&initial) {
                state.entry(initial, ctx);
            }
        }
        while self.run_until_transition(ctx) {}
    }
}
