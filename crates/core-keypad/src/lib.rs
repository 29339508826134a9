//! Composed keypad actions: single keys, chords, and encoder steps,
//! resolved from the raw `core-hal::Keypad` event stream.

mod action;
mod registry;

pub use action::{ActionEvent, ActionId};
pub use registry::{ActionRegistry, DEFAULT_COMBO_WINDOW_MS};
