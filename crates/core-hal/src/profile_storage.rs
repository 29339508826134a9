//! Binary profile import/export — spec.md §6.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Record format version tag written alongside every exported profile
/// blob; an importer rejects anything whose `version` it doesn't know.
pub const PROFILE_RECORD_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedRecord<T> {
    pub version: u16,
    pub data: T,
}

impl<T> VersionedRecord<T> {
    pub fn new(data: T) -> Self {
        Self {
            version: PROFILE_RECORD_VERSION,
            data,
        }
    }

    pub fn into_data(self) -> Result<T, CoreError> {
        if self.version != PROFILE_RECORD_VERSION {
            return Err(CoreError::ProfileInvalid(format!(
                "unsupported record version {}, expected {}",
                self.version, PROFILE_RECORD_VERSION
            )));
        }
        Ok(self.data)
    }
}

/// Import/export of arbitrary profile records to/from an external
/// medium (USB mass storage on the original hardware; a file or
/// network share in this crate's simulated implementations).
pub trait ProfileStorage: Send {
    fn export_bytes<T: Serialize>(&mut self, name: &str, data: &T) -> Result<(), CoreError>;
    fn import_bytes<T: for<'de> Deserialize<'de>>(&mut self, name: &str) -> Result<T, CoreError>;
    fn list(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_into_data() {
        let record = VersionedRecord::new(42u32);
        assert_eq!(record.into_data().unwrap(), 42);
    }

    #[test]
    fn rejects_mismatched_version() {
        let record = VersionedRecord {
            version: 99,
            data: 42u32,
        };
        assert!(record.into_data().is_err());
    }
}
