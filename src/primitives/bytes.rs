use std::fmt;

use crate::errors::{DbaseError, DbaseResult};

/// Zero-based byte position within a record or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteOffset(i32);

impl ByteOffset {
    pub const INITIAL: ByteOffset = ByteOffset(0);

    pub fn new(value: i32) -> DbaseResult<Self> {
        if value < 0 {
            return Err(DbaseError::invalid_scalar("byte offset", value));
        }
        Ok(Self(value))
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    /// Returns the offset immediately after `length` bytes starting here.
    pub fn plus(self, length: ByteLength) -> DbaseResult<Self> {
        let sum = self.0.checked_add(length.to_i32()).ok_or_else(|| {
            DbaseError::invalid_scalar("byte offset", i64::from(self.0) + i64::from(length.to_i32()))
        })?;
        Ok(Self(sum))
    }
}

impl TryFrom<i32> for ByteOffset {
    type Error = DbaseError;

    fn try_from(value: i32) -> DbaseResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for ByteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A count of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteLength(i32);

impl ByteLength {
    pub const ZERO: ByteLength = ByteLength(0);

    pub fn new(value: i32) -> DbaseResult<Self> {
        if value < 0 {
            return Err(DbaseError::invalid_scalar("byte length", value));
        }
        Ok(Self(value))
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn plus(self, other: ByteLength) -> DbaseResult<Self> {
        let sum = self.0.checked_add(other.0).ok_or_else(|| {
            DbaseError::invalid_scalar("byte length", i64::from(self.0) + i64::from(other.0))
        })?;
        Ok(Self(sum))
    }

    pub fn times(self, factor: i32) -> DbaseResult<Self> {
        let product = self.0.checked_mul(factor).ok_or_else(|| {
            DbaseError::invalid_scalar("byte length", i64::from(self.0) * i64::from(factor))
        })?;
        Self::new(product)
    }

    /// Converts to 16-bit words; odd byte counts have no word form.
    pub fn to_word_length(self) -> DbaseResult<super::WordLength> {
        if self.0 % 2 != 0 {
            return Err(DbaseError::invalid_scalar("word length in bytes", self.0));
        }
        super::WordLength::new(self.0 / 2)
    }
}

impl TryFrom<i32> for ByteLength {
    type Error = DbaseError;

    fn try_from(value: i32) -> DbaseResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for ByteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
