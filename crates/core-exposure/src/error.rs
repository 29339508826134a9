use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExposureError {
    #[error("adjustment value {0} out of range [-144, 144]")]
    AdjustmentOutOfRange(i32),

    #[error("adjusted time {0} out of range [0.01, 999] seconds")]
    AdjustedTimeOutOfRange(f64),

    #[error("burn/dodge list already has the maximum of 9 entries")]
    BurnDodgeListFull,

    #[error("burn/dodge index {0} out of bounds")]
    BurnDodgeIndexOutOfBounds(usize),

    #[error("dodge (negative numerator) is only permitted on the first entry")]
    DodgeNotFirstEntry,

    #[error("burn/dodge numerator {numerator} out of range for denominator {denominator}")]
    BurnDodgeNumeratorOutOfRange { numerator: i32, denominator: u32 },
}
