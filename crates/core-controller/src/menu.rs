//! Menu boundary state. The actual menu/selection UI is an external
//! collaborator (spec.md §1, "Out of scope") — this state only marks
//! the transition in and out of it so the rest of the state machine
//! has somewhere to hand off to and resume from.

use core_hal::Key;

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

#[derive(Default)]
pub struct MenuState;

impl ControllerState for MenuState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        ctx.display.draw_mode_text("Menu");
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };
        if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(StateId::Home);
        }
        if event.key == Key::Menu && !event.pressed {
            return Transition::Goto(StateId::Home);
        }
        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, _ctx: &mut ControllerContext) {}
}
