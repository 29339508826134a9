//! Safelight/illumination controller (L0 contract) — spec.md §6, §4.3.4.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafelightState {
    #[default]
    Home,
    Focus,
    Exposure,
    Measurement,
}

pub trait SafelightController: Send {
    fn safelight_state(&mut self, state: SafelightState);
    fn blackout(&mut self, enabled: bool);
}
