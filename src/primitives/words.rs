use std::fmt;

use super::{ByteLength, ByteOffset};
use crate::errors::{DbaseError, DbaseResult};

/// A length measured in 16-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WordLength(i32);

impl WordLength {
    pub fn new(value: i32) -> DbaseResult<Self> {
        if value < 0 {
            return Err(DbaseError::invalid_scalar("word length", value));
        }
        Ok(Self(value))
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn plus(self, other: WordLength) -> DbaseResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| DbaseError::invalid_scalar("word length", i64::from(self.0) + i64::from(other.0)))
    }

    pub fn to_byte_length(self) -> DbaseResult<ByteLength> {
        ByteLength::new(self.0).and_then(|bytes| bytes.times(2))
    }
}

impl fmt::Display for WordLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position measured in 16-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WordOffset(i32);

impl WordOffset {
    pub fn new(value: i32) -> DbaseResult<Self> {
        if value < 0 {
            return Err(DbaseError::invalid_scalar("word offset", value));
        }
        Ok(Self(value))
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn plus(self, length: WordLength) -> DbaseResult<Self> {
        self.0
            .checked_add(length.to_i32())
            .map(Self)
            .ok_or_else(|| DbaseError::invalid_scalar("word offset", i64::from(self.0) + i64::from(length.to_i32())))
    }

    pub fn to_byte_offset(self) -> DbaseResult<ByteOffset> {
        let bytes = self
            .0
            .checked_mul(2)
            .ok_or_else(|| DbaseError::invalid_scalar("word offset", self.0))?;
        ByteOffset::new(bytes)
    }
}

impl fmt::Display for WordOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
