//! State Controller (L4) — spec.md §4.5, §3.
//!
//! Coordinates the top-level screens the enlarger exposes (home,
//! focus, timer, test strip, densitometer, menu, and the adjustment
//! editors) as an explicit `entry`/`process`/`exit` state machine.
//! Building and executing an actual exposure run is delegated to
//! `core_engine`; this crate only decides *when* to ask for one (see
//! `ControllerContext::pending_run`).

mod adjustment;
mod context;
mod densitometer;
mod focus;
mod fsm;
mod home;
mod menu;
mod mode;
mod test_strip;
mod timer;

pub use adjustment::{EditAdjustmentState, ListAdjustmentsState};
pub use context::ControllerContext;
pub use densitometer::DensitometerState;
pub use focus::{FocusState, FOCUS_TIMEOUT_MS};
pub use fsm::{ControllerState, StateController, StateId, Transition};
pub use home::{ChangeTimeIncrementState, HomeState};
pub use menu::MenuState;
pub use mode::{AdjustAbsoluteState, AdjustFineState, ChangeModeState};
pub use test_strip::TestStripState;
pub use timer::TimerState;

/// Build a `StateController` with every screen registered, starting at
/// `StateId::Home` — the composition root a binary crate wires its
/// hardware through via `ControllerContext`.
pub fn build_controller() -> StateController {
    let mut controller = StateController::new(StateId::Home);
    controller.register(StateId::Home, Box::new(HomeState::default()));
    controller.register(
        StateId::ChangeTimeIncrement,
        Box::new(ChangeTimeIncrementState),
    );
    controller.register(StateId::Timer, Box::new(TimerState::default()));
    controller.register(StateId::Focus, Box::new(FocusState::default()));
    controller.register(StateId::TestStrip, Box::new(TestStripState::default()));
    controller.register(
        StateId::EditAdjustment,
        Box::new(EditAdjustmentState::default()),
    );
    controller.register(
        StateId::ListAdjustments,
        Box::new(ListAdjustmentsState::default()),
    );
    controller.register(StateId::Menu, Box::new(MenuState));
    controller.register(
        StateId::Densitometer,
        Box::new(DensitometerState::default()),
    );
    controller.register(StateId::ChangeMode, Box::new(ChangeModeState::default()));
    controller.register(StateId::AdjustFine, Box::new(AdjustFineState::default()));
    controller.register(
        StateId::AdjustAbsolute,
        Box::new(AdjustAbsoluteState::default()),
    );
    controller
}
