use std::fmt;

use crate::errors::{DbaseError, DbaseResult};

/// Column name: 1..=10 printable ASCII characters.
///
/// Stored in the field descriptor as an 11-byte slot padded with NUL bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbaseFieldName(String);

impl DbaseFieldName {
    pub const MAX_LENGTH: usize = 10;
    /// Size of the name slot in a field descriptor, including the NUL terminator
    pub const SLOT_LENGTH: usize = 11;

    pub fn new(name: impl Into<String>) -> DbaseResult<Self> {
        let name = name.into();
        let reject = |reason: &str| DbaseError::InvalidFieldName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name is empty"));
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(reject("name is longer than 10 characters"));
        }
        if !name.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
            return Err(reject("name must be printable ASCII"));
        }
        if name.trim().is_empty() {
            return Err(reject("name is blank"));
        }

        Ok(Self(name))
    }

    /// Decodes the NUL-padded descriptor slot.
    pub fn from_slot(slot: &[u8]) -> DbaseResult<Self> {
        let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        let raw = &slot[..end];
        let text = std::str::from_utf8(raw).map_err(|_| DbaseError::InvalidFieldName {
            name: String::from_utf8_lossy(raw).into_owned(),
            reason: "name must be printable ASCII".into(),
        })?;
        Self::new(text.trim_end())
    }

    /// Encodes into the NUL-padded descriptor slot.
    pub fn to_slot(&self) -> [u8; Self::SLOT_LENGTH] {
        let mut slot = [0u8; Self::SLOT_LENGTH];
        slot[..self.0.len()].copy_from_slice(self.0.as_bytes());
        slot
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, as dBase treats column names.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for DbaseFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for DbaseFieldName {
    type Error = DbaseError;

    fn try_from(value: &str) -> DbaseResult<Self> {
        Self::new(value)
    }
}
