//! Burn/dodge adjustment editor and list — grounded on
//! `state_edit_adjustment`/`state_list_adjustments` in
//! `state_adjustment.c`.

use core_exposure::{BurnDodgeEntry, MAX_BURN_DODGE_ENTRIES};
use core_hal::Key;
use core_profile::ContrastGrade;

use crate::fsm::{ControllerState, StateId, Transition};
use crate::ControllerContext;

fn cycle_grade_up(grade: Option<ContrastGrade>) -> Option<ContrastGrade> {
    match grade {
        None => Some(ContrastGrade::G00),
        Some(ContrastGrade::G5) => None,
        Some(g) => g.next(),
    }
}

fn cycle_grade_down(grade: Option<ContrastGrade>) -> Option<ContrastGrade> {
    match grade {
        None => Some(ContrastGrade::G5),
        Some(ContrastGrade::G00) => None,
        Some(g) => g.prev(),
    }
}

pub struct EditAdjustmentState {
    working_index: usize,
    working: BurnDodgeEntry,
    stop_inc_den: u32,
    value_accepted: bool,
}

impl Default for EditAdjustmentState {
    fn default() -> Self {
        Self {
            working_index: 0,
            working: BurnDodgeEntry {
                numerator: 0,
                denominator: 1,
                grade_override: None,
            },
            stop_inc_den: 1,
            value_accepted: false,
        }
    }
}

impl ControllerState for EditAdjustmentState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.stop_inc_den = ctx.exposure.adjustment_increment.as_twelfths() as u32;
        let index = ctx
            .pending_edit_index
            .take()
            .unwrap_or_else(|| ctx.exposure.burn_dodge_entries().len());
        self.working_index = index;
        self.working = ctx
            .exposure
            .burn_dodge_entries()
            .get(index)
            .copied()
            .unwrap_or(BurnDodgeEntry {
                numerator: 0,
                denominator: self.stop_inc_den,
                grade_override: None,
            });
        self.value_accepted = false;
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let adjusted = core_exposure::exposure_time(&ctx.exposure);
        let stops = self.working.stops();
        let adj_time = adjusted * 2f64.powf(stops);
        ctx.display.draw_mode_text(&format!(
            "Area {} {:+.2}s (base {:.2}s, {}/{})",
            self.working_index + 1,
            adj_time - adjusted,
            adjusted,
            self.working.numerator,
            self.working.denominator
        ));

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        let nine = self.stop_inc_den as i32 * 9;
        if event.is_released_or_repeated(Key::IncExposure) {
            if self.working.denominator != self.stop_inc_den {
                let stops = self.working.stops();
                let mut updated = (stops * self.stop_inc_den as f64).ceil() as i32;
                let updated_stops = updated as f64 / self.stop_inc_den as f64;
                if (stops - updated_stops).abs() > 0.001 && updated < nine {
                    updated += 1;
                }
                self.working.numerator = updated;
                self.working.denominator = self.stop_inc_den;
            } else if self.working.numerator < nine {
                self.working.numerator += 1;
            }
        } else if event.is_released_or_repeated(Key::DecExposure) {
            if self.working_index == 0 || self.working.numerator > 0 {
                if self.working.denominator != self.stop_inc_den {
                    let stops = self.working.stops();
                    let mut updated = (stops * self.stop_inc_den as f64).floor() as i32;
                    let updated_stops = updated as f64 / self.stop_inc_den as f64;
                    if (stops - updated_stops).abs() > 0.001 && updated > -nine {
                        updated -= 1;
                    }
                    self.working.numerator = updated;
                    self.working.denominator = self.stop_inc_den;
                } else if self.working.numerator > -nine {
                    self.working.numerator -= 1;
                }
            }
        } else if event.is_released_or_repeated(Key::IncContrast) {
            if self.working.numerator > 0 {
                self.working.grade_override = cycle_grade_up(self.working.grade_override);
            }
        } else if event.is_released_or_repeated(Key::DecContrast) {
            if self.working.numerator > 0 {
                self.working.grade_override = cycle_grade_down(self.working.grade_override);
            }
        } else if event.is_released_or_repeated(Key::AddAdjustment) {
            if self.working.numerator != 0 {
                self.value_accepted = true;
                if self.working_index + 1 < MAX_BURN_DODGE_ENTRIES {
                    ctx.pending_edit_index = Some(self.working_index + 1);
                    return Transition::Goto(StateId::EditAdjustment);
                }
                return Transition::Goto(StateId::Home);
            }
        } else if event.key == Key::Menu && !event.pressed {
            if self.working.numerator != 0 {
                self.value_accepted = true;
                return Transition::Goto(StateId::Home);
            }
        } else if event.key == Key::Cancel && !event.pressed {
            self.value_accepted = false;
            return Transition::Goto(StateId::Home);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, ctx: &mut ControllerContext) {
        if !self.value_accepted || self.working.numerator == 0 {
            return;
        }
        if self.working.numerator < 0 {
            self.working.grade_override = None;
        }
        if self.working_index < ctx.exposure.burn_dodge_entries().len() {
            let _ = ctx.exposure.set_burn_dodge(self.working_index, self.working);
        } else {
            let _ = ctx.exposure.add_burn_dodge(self.working);
        }
    }
}

#[derive(Default)]
pub struct ListAdjustmentsState {
    selected: usize,
}

impl ControllerState for ListAdjustmentsState {
    fn entry(&mut self, _prev: StateId, ctx: &mut ControllerContext) {
        self.selected = 0;
        for (i, entry) in ctx.exposure.burn_dodge_entries().iter().enumerate() {
            tracing::info!(index = i, numerator = entry.numerator, denominator = entry.denominator, "adjustment");
        }
    }

    fn process(&mut self, ctx: &mut ControllerContext) -> Transition {
        let entries = ctx.exposure.burn_dodge_entries();
        if entries.is_empty() {
            return Transition::Goto(StateId::Home);
        }
        self.selected = self.selected.min(entries.len() - 1);

        let lines: String = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let marker = if i == self.selected { ">" } else { " " };
                let kind = if e.numerator >= 0 { "Burn" } else { "Dodge" };
                format!("{marker}[{}] {kind} {}/{}", i + 1, e.numerator, e.denominator)
            })
            .collect::<Vec<_>>()
            .join("\n");
        ctx.display.draw_mode_text(&lines);

        let Some(event) = ctx.keypad.wait_for_event(None) else {
            return Transition::Stay;
        };

        if event.is_released_or_repeated(Key::IncExposure) {
            self.selected = (self.selected + 1) % entries.len();
        } else if event.is_released_or_repeated(Key::DecExposure) {
            self.selected = self.selected.checked_sub(1).unwrap_or(entries.len() - 1);
        } else if event.is_released_or_repeated(Key::AddAdjustment) {
            ctx.pending_edit_index = Some(self.selected);
            return Transition::Goto(StateId::EditAdjustment);
        } else if event.key == Key::Menu && !event.pressed {
            let _ = ctx.exposure.remove_burn_dodge(self.selected);
            if ctx.exposure.burn_dodge_entries().is_empty() {
                return Transition::Goto(StateId::Home);
            }
        } else if event.key == Key::Cancel && !event.pressed {
            return Transition::Goto(StateId::Home);
        }

        Transition::Stay
    }

    fn exit(&mut self, _next: StateId, _ctx: &mut ControllerContext) {}
}
