//! Exposure timer state machine — spec.md §4.3.2/§4.3.3, transcribed
//! from `exposure_timer_notify` in `exposure_timer.c`. Every `tick()`
//! call represents one 10ms ISR tick; the caller supplies the
//! live-read cancellation flag and interprets the returned effects.

use crate::delays::DerivedDelays;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    None,
    Start,
    Tick,
    End,
    Done,
}

/// How often a `Tick`-state notification should reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackRate {
    Every10Ms,
    Every100Ms,
    Every1Sec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerNotification {
    pub state: TimerState,
    pub remaining_ms: u32,
}

/// What the caller must do in response to one `tick()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEffects {
    pub set_actuator: Option<bool>,
    pub set_buzzer: Option<bool>,
    pub notify: Option<TimerNotification>,
}

pub struct TimerStateMachine {
    delays: DerivedDelays,
    callback_rate: CallbackRate,
    state: TimerState,
    time_elapsed_ms: u32,
    relay_activated: bool,
    relay_deactivated: bool,
    notify_end_sent: bool,
    buzz_start: u32,
    buzz_stop: u32,
}

impl TimerStateMachine {
    pub fn new(delays: DerivedDelays, callback_rate: CallbackRate) -> Self {
        Self {
            delays,
            callback_rate,
            state: TimerState::None,
            time_elapsed_ms: 0,
            relay_activated: false,
            relay_deactivated: false,
            notify_end_sent: false,
            buzz_start: 0,
            buzz_stop: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TimerState::Done
    }

    /// Advance the state machine by one 10ms tick. `cancel_requested`
    /// is read live each call; once the caller starts reporting `true`
    /// it should keep doing so until the run reaches `Done`.
    pub fn tick(&mut self, cancel_requested: bool) -> TickEffects {
        let mut effects = TickEffects::default();

        if !self.relay_activated {
            effects.set_actuator = Some(true);
            self.relay_activated = true;
        } else {
            self.time_elapsed_ms += 10;
        }

        if self.state == TimerState::None {
            if self.time_elapsed_ms >= self.delays.relay_on_delay_ms {
                self.state = TimerState::Start;
                self.buzz_start = if self.delays.requested_ms % 1000 == 0 {
                    self.time_elapsed_ms + 1000
                } else {
                    self.time_elapsed_ms + (self.delays.requested_ms % 1000)
                };
                self.buzz_stop = 0;
            } else {
                return effects;
            }
        }

        if !self.relay_deactivated
            && (self.time_elapsed_ms
                >= self.delays.relay_on_delay_ms
                    + (self.delays.requested_ms - self.delays.relay_off_delay_ms)
                || cancel_requested)
        {
            effects.set_actuator = Some(false);
            self.relay_deactivated = true;
        }

        if matches!(self.state, TimerState::Start | TimerState::Tick)
            && (self.time_elapsed_ms >= self.delays.requested_ms + self.delays.relay_on_delay_ms
                || cancel_requested)
        {
            self.state = TimerState::End;
        }

        if self.buzz_start > 0 && self.time_elapsed_ms >= self.buzz_start {
            effects.set_buzzer = Some(true);
            self.buzz_stop = self.buzz_start + 40;
            if matches!(self.state, TimerState::Start | TimerState::Tick) {
                self.buzz_start += 1000;
            } else {
                self.buzz_start = 0;
            }
        } else if self.buzz_stop > 0 && self.time_elapsed_ms >= self.buzz_stop {
            effects.set_buzzer = Some(false);
            self.buzz_stop = 0;
        }

        let notify_state = self.state;
        let notify_timer = match self.state {
            TimerState::None | TimerState::Start => self.delays.requested_ms,
            TimerState::Tick => {
                self.delays.requested_ms - (self.time_elapsed_ms - self.delays.relay_on_delay_ms)
            }
            TimerState::End | TimerState::Done => 0,
        };

        let should_notify = match self.state {
            TimerState::Tick => match self.callback_rate {
                CallbackRate::Every10Ms => true,
                CallbackRate::Every100Ms => notify_timer % 100 == 0,
                CallbackRate::Every1Sec => notify_timer % 1000 == 0,
            },
            TimerState::End => {
                if !self.notify_end_sent {
                    self.notify_end_sent = true;
                    true
                } else {
                    false
                }
            }
            _ => true,
        };

        if should_notify {
            effects.notify = Some(TimerNotification {
                state: notify_state,
                remaining_ms: notify_timer,
            });
        }

        if self.state == TimerState::Start {
            self.state = TimerState::Tick;
        } else if self.state == TimerState::End
            && self.buzz_stop == 0
            && (self.time_elapsed_ms
                > self.delays.relay_on_delay_ms
                    + self.delays.requested_ms
                    + self.delays.exposure_end_delay_ms
                || cancel_requested)
        {
            self.state = TimerState::Done;
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delays() -> DerivedDelays {
        DerivedDelays {
            requested_ms: 1000,
            relay_on_delay_ms: 20,
            relay_off_delay_ms: 10,
            exposure_end_delay_ms: 30,
        }
    }

    #[test]
    fn first_tick_asserts_actuator_on_without_advancing_clock() {
        let mut sm = TimerStateMachine::new(delays(), CallbackRate::Every1Sec);
        let effects = sm.tick(false);
        assert_eq!(effects.set_actuator, Some(true));
    }

    #[test]
    fn run_to_completion_eventually_reaches_done() {
        let mut sm = TimerStateMachine::new(delays(), CallbackRate::Every10Ms);
        let mut ticks = 0;
        while !sm.is_done() && ticks < 1000 {
            sm.tick(false);
            ticks += 1;
        }
        assert!(sm.is_done());
    }

    #[test]
    fn relay_turns_off_before_requested_time_ends() {
        let mut sm = TimerStateMachine::new(delays(), CallbackRate::Every10Ms);
        let mut saw_off = false;
        for _ in 0..200 {
            let effects = sm.tick(false);
            if effects.set_actuator == Some(false) {
                saw_off = true;
                break;
            }
            if sm.is_done() {
                break;
            }
        }
        assert!(saw_off);
    }

    #[test]
    fn cancellation_still_drains_the_end_delay() {
        let mut sm = TimerStateMachine::new(delays(), CallbackRate::Every10Ms);
        sm.tick(false);
        for _ in 0..5 {
            sm.tick(false);
        }
        let mut ticks = 0;
        while !sm.is_done() && ticks < 1000 {
            sm.tick(true);
            ticks += 1;
        }
        assert!(sm.is_done());
    }

    #[test]
    fn end_state_notifies_exactly_once() {
        let mut sm = TimerStateMachine::new(delays(), CallbackRate::Every1Sec);
        let mut end_notifications = 0;
        let mut ticks = 0;
        while !sm.is_done() && ticks < 1000 {
            let effects = sm.tick(false);
            if let Some(n) = effects.notify {
                if n.state == TimerState::End {
                    end_notifications += 1;
                }
            }
            ticks += 1;
        }
        assert_eq!(end_notifications, 1);
    }
}
