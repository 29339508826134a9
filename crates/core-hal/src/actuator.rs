//! Light Actuator (L0 contract) — spec.md §4.1.
//!
//! A small trait abstracting over two concrete backends (relay / DMX)
//! so the engine never has to know which one it's driving.

use crate::error::CoreError;

/// What `set_exposure` should drive the light to. The engine and plan
/// builder decide which variant applies; the actuator itself does not
/// need to know about contrast grades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExposureTarget {
    /// Mechanical relay: lamp on at full output, contrast via filter.
    Relay,
    /// Dimmable head: per-channel levels (R, G, B, W).
    Channels([u16; 4]),
}

pub trait LightActuator: Send {
    /// Force the lamp off. Idempotent; latency <= one 10ms tick.
    fn set_off(&mut self) -> Result<(), CoreError>;
    /// Lamp on at a safe steady state for composition.
    fn set_focus(&mut self) -> Result<(), CoreError>;
    /// Lamp on at the values required to expose.
    fn set_exposure(&mut self, target: ExposureTarget) -> Result<(), CoreError>;
    /// Purely observational.
    fn is_enabled(&self) -> bool;
}

/// Boolean GPIO pin abstraction, implemented by the platform HAL.
pub trait GpioPin: Send {
    fn set(&mut self, high: bool);
    fn get(&self) -> bool;
}

/// Vector-of-channels wire protocol (DMX-like) abstraction.
pub trait DmxBus: Send {
    /// Send the given channel levels; implementors degrade silently on
    /// bus faults (spec.md §4.1: "a faulted DMX bus is an external
    /// concern that degrades silently").
    fn send(&mut self, channels: &[u16]);
}

/// Mechanical enlarger controlled by a boolean relay.
pub struct RelayActuator<P: GpioPin> {
    pin: P,
    enabled: bool,
}

impl<P: GpioPin> RelayActuator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, enabled: false }
    }
}

impl<P: GpioPin> LightActuator for RelayActuator<P> {
    fn set_off(&mut self) -> Result<(), CoreError> {
        self.pin.set(false);
        self.enabled = false;
        Ok(())
    }

    fn set_focus(&mut self) -> Result<(), CoreError> {
        self.pin.set(true);
        self.enabled = true;
        Ok(())
    }

    fn set_exposure(&mut self, _target: ExposureTarget) -> Result<(), CoreError> {
        self.pin.set(true);
        self.enabled = true;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Dimmable RGB/RGBW head controlled over a DMX-style channel bus.
pub struct DmxActuator<B: DmxBus> {
    bus: B,
    channel_count: usize,
    focus_levels: [u16; 4],
    enabled: bool,
}

impl<B: DmxBus> DmxActuator<B> {
    /// `channel_count` is 3 (RGB) or 4 (RGBW); extra channels are
    /// always sent as zero.
    pub fn new(bus: B, channel_count: usize, focus_levels: [u16; 4]) -> Self {
        Self {
            bus,
            channel_count: channel_count.clamp(3, 4),
            focus_levels,
            enabled: false,
        }
    }

    fn send(&mut self, levels: [u16; 4]) {
        self.bus.send(&levels[..self.channel_count]);
    }
}

impl<B: DmxBus> LightActuator for DmxActuator<B> {
    fn set_off(&mut self) -> Result<(), CoreError> {
        self.send([0; 4]);
        self.enabled = false;
        Ok(())
    }

    fn set_focus(&mut self) -> Result<(), CoreError> {
        let levels = self.focus_levels;
        self.send(levels);
        self.enabled = true;
        Ok(())
    }

    fn set_exposure(&mut self, target: ExposureTarget) -> Result<(), CoreError> {
        match target {
            ExposureTarget::Channels(levels) => self.send(levels),
            ExposureTarget::Relay => {
                return Err(CoreError::InvalidExposure(
                    "DMX actuator requires channel levels, not a relay target".into(),
                ));
            }
        }
        self.enabled = true;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct MockPin(Arc<Mutex<bool>>);
    impl GpioPin for MockPin {
        fn set(&mut self, high: bool) {
            *self.0.lock().unwrap() = high;
        }
        fn get(&self) -> bool {
            *self.0.lock().unwrap()
        }
    }

    struct MockBus(Arc<Mutex<Vec<u16>>>);
    impl DmxBus for MockBus {
        fn send(&mut self, channels: &[u16]) {
            *self.0.lock().unwrap() = channels.to_vec();
        }
    }

    #[test]
    fn relay_off_is_idempotent() {
        let state = Arc::new(Mutex::new(false));
        let mut actuator = RelayActuator::new(MockPin(state.clone()));
        actuator.set_exposure(ExposureTarget::Relay).unwrap();
        assert!(actuator.is_enabled());
        actuator.set_off().unwrap();
        actuator.set_off().unwrap();
        assert!(!actuator.is_enabled());
        assert!(!*state.lock().unwrap());
    }

    #[test]
    fn dmx_sends_only_configured_channel_count() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut actuator = DmxActuator::new(MockBus(sent.clone()), 3, [0, 0, 0, 0]);
        actuator
            .set_exposure(ExposureTarget::Channels([10, 20, 30, 40]))
            .unwrap();
        assert_eq!(*sent.lock().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn dmx_rejects_relay_target() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut actuator = DmxActuator::new(MockBus(sent), 4, [0; 4]);
        assert!(actuator.set_exposure(ExposureTarget::Relay).is_err());
    }
}
