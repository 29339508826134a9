//! Display surface (L0 contract) — spec.md §6.
//!
//! The display is an external collaborator (out of scope per spec.md
//! §1); this crate only defines the value types the core builds and
//! the synchronous draw calls it expects to be able to make.

/// Contrast grade as shown to the user (includes half-grades).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayGrade {
    None,
    G00,
    G0,
    G0Half,
    G1,
    G1Half,
    G2,
    G2Half,
    G3,
    G3Half,
    G4,
    G4Half,
    G5,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainPrintingView {
    pub tone_graph: u32,
    pub contrast_grade: DisplayGrade,
    pub time_seconds: u32,
    pub time_milliseconds: u32,
    pub fraction_digits: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestStripView {
    pub patch_count: u8,
    pub current_patch: u8,
    pub patch_time_ms: u32,
    /// Bit `patch_count - i - 1` set for each patch `i` already exposed.
    pub covered_patches: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDisplayState {
    Pending,
    Running,
    Ending,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerView {
    pub state: TimerDisplayState,
    pub remaining_ms: u32,
    pub valid: bool,
}

pub trait DisplaySurface: Send {
    fn draw_main_printing(&mut self, view: &MainPrintingView);
    fn draw_test_strip_elements(&mut self, view: &TestStripView);
    fn draw_exposure_timer(&mut self, view: &TimerView);
    fn draw_mode_text(&mut self, text: &str);
    fn redraw_tone_graph(&mut self, bits: u32);
}
