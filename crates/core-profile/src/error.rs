use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("enlarger profile invalid: {0}")]
    EnlargerInvalid(String),
    #[error("paper profile invalid: {0}")]
    PaperInvalid(String),
    #[error("step wedge invalid: {0}")]
    StepWedgeInvalid(String),
    #[error("unsupported record version {found}, expected {expected}")]
    VersionMismatch { found: u16, expected: u16 },
}
