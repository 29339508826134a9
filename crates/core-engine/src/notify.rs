//! Latest-value-wins notification cell — the userland analogue of
//! `xTaskNotifyFromISR(..., eSetValueWithOverwrite, ...)` in
//! `exposure_timer.c`: the ISR never blocks on a full queue, it simply
//! overwrites whatever the consumer hasn't read yet.

use std::sync::Mutex;

use tokio::sync::Notify;

pub struct LatestSlot<T> {
    value: Mutex<Option<T>>,
    notify: Notify,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Overwrite the slot and wake exactly one waiter.
    pub fn publish(&self, value: T) {
        *self.value.lock().expect("LatestSlot poisoned") = Some(value);
        self.notify.notify_one();
    }

    /// Wait until a value has been published, then take it.
    pub async fn recv(&self) -> T {
        loop {
            if let Some(v) = self.value.lock().expect("LatestSlot poisoned").take() {
                return v;
            }
            self.notify.notified().await;
        }
    }

    /// Non-blocking: take whatever is currently in the slot, if anything.
    pub fn try_recv(&self) -> Option<T> {
        self.value.lock().expect("LatestSlot poisoned").take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_then_recv_round_trips() {
        let slot = LatestSlot::new();
        slot.publish(42);
        assert_eq!(slot.recv().await, 42);
    }

    #[tokio::test]
    async fn later_publish_overwrites_unread_value() {
        let slot = LatestSlot::new();
        slot.publish(1);
        slot.publish(2);
        assert_eq!(slot.recv().await, 2);
    }

    #[test]
    fn try_recv_is_none_when_empty() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        assert_eq!(slot.try_recv(), None);
    }
}
