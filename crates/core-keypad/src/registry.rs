//! Composed-action dispatch over the raw `core-hal::Keypad` stream.
//!
//! Accumulate-then-emit: raw events feed a small pending-combo buffer,
//! and a composed `ActionEvent` is only emitted once a registered
//! binding is unambiguously satisfied or a combo window expires.

use smallvec::SmallVec;
use tracing::{debug, trace};

use core_hal::{Key, Keypad, KeypadEvent};

use crate::action::{ActionEvent, ActionId, Binding, Registration};

/// Default window within which all keys of a combo must be observed
/// pressed for the combo to fire (`keypad_action.c` uses a short window
/// rather than requiring exact simultaneity).
pub const DEFAULT_COMBO_WINDOW_MS: u64 = 150;

pub struct ActionRegistry {
    registrations: Vec<Registration>,
    next_id: u32,
    pending_combo_keys: SmallVec<[Key; 4]>,
    pending_since_ms: Option<u64>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            next_id: 0,
            pending_combo_keys: SmallVec::new(),
            pending_since_ms: None,
        }
    }

    fn register(&mut self, binding: Binding) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        debug!(target = "keypad.registry", ?binding, id = id.0, "registered");
        self.registrations.push(Registration { id, binding });
        id
    }

    /// Bind a single key press to an action.
    pub fn add_single(&mut self, key: Key) -> ActionId {
        self.register(Binding::Single(key))
    }

    /// Bind a set of keys that must all be pressed within
    /// `DEFAULT_COMBO_WINDOW_MS` of each other.
    pub fn add_combo(&mut self, keys: &[Key]) -> ActionId {
        self.add_combo_with_window(keys, DEFAULT_COMBO_WINDOW_MS)
    }

    pub fn add_combo_with_window(&mut self, keys: &[Key], window_ms: u64) -> ActionId {
        self.register(Binding::Combo(keys.iter().copied().collect(), window_ms))
    }

    /// Bind an encoder key (`EncoderCw`/`EncoderCcw`); `wait` resolves
    /// the signed step count regardless of which rotation direction
    /// triggered it.
    pub fn add_encoder(&mut self, key: Key) -> ActionId {
        self.register(Binding::Encoder(key))
    }

    /// Block (via the keypad's own blocking wait) until a registered
    /// binding fires or `timeout_ms` elapses with nothing matching.
    pub fn wait(&mut self, keypad: &mut dyn Keypad, timeout_ms: Option<u64>) -> ActionEvent {
        loop {
            let Some(event) = keypad.wait_for_event(timeout_ms) else {
                self.pending_combo_keys.clear();
                self.pending_since_ms = None;
                return ActionEvent::TimedOut;
            };

            if let Some(action) = self.feed(event) {
                return action;
            }
        }
    }

    fn feed(&mut self, event: KeypadEvent) -> Option<ActionEvent> {
        trace!(target = "keypad.registry", ?event, "raw_event");

        if matches!(event.key, Key::EncoderCw | Key::EncoderCcw) {
            let signed = match event.key {
                Key::EncoderCw => event.count as i32,
                Key::EncoderCcw => -(event.count as i32),
                _ => unreachable!(),
            };
            if let Some(reg) = self
                .registrations
                .iter()
                .find(|r| matches!(r.binding, Binding::Encoder(k) if k == event.key))
            {
                return Some(ActionEvent::Encoder(reg.id, signed));
            }
            return None;
        }

        if !event.pressed {
            return None;
        }

        if !self.pending_combo_keys.contains(&event.key) {
            self.pending_combo_keys.push(event.key);
        }

        if let Some(reg) = self.registrations.iter().find(|r| {
            matches!(&r.binding, Binding::Combo(keys, _)
                if keys.len() == self.pending_combo_keys.len()
                    && keys.iter().all(|k| self.pending_combo_keys.contains(k)))
        }) {
            self.pending_combo_keys.clear();
            self.pending_since_ms = None;
            return Some(ActionEvent::Fired(reg.id));
        }

        let any_combo_could_still_match = self.registrations.iter().any(|r| {
            matches!(&r.binding, Binding::Combo(keys, _)
                if keys.len() >= self.pending_combo_keys.len()
                    && self.pending_combo_keys.iter().all(|k| keys.contains(k)))
        });

        if any_combo_could_still_match && self.pending_combo_keys.len() > 1 {
            return None;
        }

        if let Some(reg) = self
            .registrations
            .iter()
            .find(|r| matches!(r.binding, Binding::Single(k) if k == event.key))
        {
            self.pending_combo_keys.clear();
            return Some(ActionEvent::Fired(reg.id));
        }

        self.pending_combo_keys.clear();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedKeypad {
        events: std::collections::VecDeque<KeypadEvent>,
    }

    impl Keypad for ScriptedKeypad {
        fn wait_for_event(&mut self, _timeout_ms: Option<u64>) -> Option<KeypadEvent> {
            self.events.pop_front()
        }
    }

    #[test]
    fn single_key_fires_immediately() {
        let mut registry = ActionRegistry::new();
        let start = registry.add_single(Key::Start);
        let mut keypad = ScriptedKeypad {
            events: [KeypadEvent::press(Key::Start)].into(),
        };
        assert_eq!(
            registry.wait(&mut keypad, Some(10)),
            ActionEvent::Fired(start)
        );
    }

    #[test]
    fn combo_requires_all_keys() {
        let mut registry = ActionRegistry::new();
        let combo = registry.add_combo(&[Key::Menu, Key::Cancel]);
        let mut keypad = ScriptedKeypad {
            events: [
                KeypadEvent::press(Key::Menu),
                KeypadEvent::press(Key::Cancel),
            ]
            .into(),
        };
        assert_eq!(
            registry.wait(&mut keypad, Some(10)),
            ActionEvent::Fired(combo)
        );
    }

    #[test]
    fn encoder_reports_signed_step() {
        let mut registry = ActionRegistry::new();
        let enc = registry.add_encoder(Key::EncoderCw);
        let mut keypad = ScriptedKeypad {
            events: [KeypadEvent::encoder(Key::EncoderCw, 3)].into(),
        };
        assert_eq!(
            registry.wait(&mut keypad, Some(10)),
            ActionEvent::Encoder(enc, 3)
        );
    }

    #[test]
    fn empty_stream_times_out() {
        let mut registry = ActionRegistry::new();
        registry.add_single(Key::Start);
        let mut keypad = ScriptedKeypad {
            events: Default::default(),
        };
        assert_eq!(registry.wait(&mut keypad, Some(10)), ActionEvent::TimedOut);
    }
}
