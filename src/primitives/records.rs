use std::fmt;

use crate::errors::{DbaseError, DbaseResult};

/// One-based position of a record within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordNumber(i32);

impl RecordNumber {
    pub fn new(value: i32) -> DbaseResult<Self> {
        if value < 1 {
            return Err(DbaseError::invalid_scalar("record number", value));
        }
        Ok(Self(value))
    }

    /// The first record of a file.
    pub fn initial() -> Self {
        Self(1)
    }

    pub fn next(self) -> DbaseResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| DbaseError::invalid_scalar("record number", i64::from(self.0) + 1))
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }
}

impl Default for RecordNumber {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for RecordNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of records declared by a file header (stored as u32 LE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordCount(u32);

impl RecordCount {
    pub const ZERO: RecordCount = RecordCount(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }

    pub fn plus(self, other: RecordCount) -> DbaseResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| DbaseError::invalid_scalar("record count", i64::from(self.0) + i64::from(other.0)))
    }
}

impl From<u32> for RecordCount {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for RecordCount {
    type Error = DbaseError;

    fn try_from(value: i64) -> DbaseResult<Self> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| DbaseError::invalid_scalar("record count", value))
    }
}

impl fmt::Display for RecordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
