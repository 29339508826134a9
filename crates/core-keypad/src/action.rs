//! Action identifiers and bindings — grounded on `keypad_action.c`'s
//! `add_single`/`add_combo`/`add_encoder` registration pattern.

use smallvec::SmallVec;

use core_hal::Key;

/// Opaque handle returned by `ActionRegistry::add_*`, passed back to the
/// caller by `ActionRegistry::wait` when that binding fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub(crate) u32);

/// What a caller receives from `ActionRegistry::wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// A single-key or combo binding fired.
    Fired(ActionId),
    /// An encoder binding fired, carrying its signed step count
    /// (positive for `EncoderCw`, negative for `EncoderCcw`).
    Encoder(ActionId, i32),
    /// No binding matched before the wait timeout elapsed.
    TimedOut,
}

#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Single(Key),
    /// Keys must all be observed pressed within `window_ms` of each other.
    Combo(SmallVec<[Key; 4]>, u64),
    Encoder(Key),
}

#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub id: ActionId,
    pub binding: Binding,
}
