//! Profile records: enlarger timing, paper characteristic curves, and
//! the step wedge used to calibrate both.

mod enlarger;
mod error;
mod grade;
mod paper;
mod pev;
mod step_wedge;

pub use enlarger::{ChannelCount, EnlargerControl, EnlargerProfile, FIELD_CEILING_MS};
pub use error::ProfileError;
pub use grade::{ContrastGrade, GRADE_COUNT};
pub use paper::{PaperProfile, PaperProfileGrade};
pub use pev::{exposure_from_pev, pev_from_exposure};
pub use step_wedge::StepWedge;
