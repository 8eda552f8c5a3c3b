use std::fmt;

use super::ByteLength;
use crate::errors::{DbaseError, DbaseResult};

/// Width of a field in bytes, 0..=254.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DbaseFieldLength(u8);

impl DbaseFieldLength {
    pub const MAX: u8 = 254;

    pub fn new(value: i32) -> DbaseResult<Self> {
        if !(0..=i32::from(Self::MAX)).contains(&value) {
            return Err(DbaseError::invalid_scalar("field length", value));
        }
        Ok(Self(value as u8))
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }

    pub fn to_usize(self) -> usize {
        usize::from(self.0)
    }

    pub fn to_byte_length(self) -> ByteLength {
        // 0..=254 always fits
        ByteLength::new(i32::from(self.0)).unwrap_or(ByteLength::ZERO)
    }

    pub fn plus(self, other: DbaseFieldLength) -> DbaseResult<Self> {
        Self::new(i32::from(self.0) + i32::from(other.0))
    }
}

impl TryFrom<u8> for DbaseFieldLength {
    type Error = DbaseError;

    fn try_from(value: u8) -> DbaseResult<Self> {
        Self::new(i32::from(value))
    }
}

impl fmt::Display for DbaseFieldLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of digits after the decimal point, 0..=254.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DbaseDecimalCount(u8);

impl DbaseDecimalCount {
    pub const MAX: u8 = 254;
    pub const ZERO: DbaseDecimalCount = DbaseDecimalCount(0);

    pub fn new(value: i32) -> DbaseResult<Self> {
        if !(0..=i32::from(Self::MAX)).contains(&value) {
            return Err(DbaseError::invalid_scalar("decimal count", value));
        }
        Ok(Self(value as u8))
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }

    pub fn to_usize(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for DbaseDecimalCount {
    type Error = DbaseError;

    fn try_from(value: u8) -> DbaseResult<Self> {
        Self::new(i32::from(value))
    }
}

impl fmt::Display for DbaseDecimalCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-number digit capacity of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DbaseIntegerDigits(u8);

impl DbaseIntegerDigits {
    pub const ZERO: DbaseIntegerDigits = DbaseIntegerDigits(0);

    pub fn new(value: i32) -> DbaseResult<Self> {
        if !(0..=i32::from(DbaseFieldLength::MAX)).contains(&value) {
            return Err(DbaseError::invalid_scalar("integer digits", value));
        }
        Ok(Self(value as u8))
    }

    pub fn to_usize(self) -> usize {
        usize::from(self.0)
    }

    /// One digit fewer, saturating at zero.
    pub fn minus_one(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for DbaseIntegerDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_length_bounds() {
        assert!(DbaseFieldLength::new(0).is_ok());
        assert!(DbaseFieldLength::new(254).is_ok());
        assert!(DbaseFieldLength::new(255).is_err());
        assert!(DbaseFieldLength::new(-1).is_err());
        assert!(DbaseFieldLength::try_from(255u8).is_err());
    }

    #[test]
    fn test_decimal_count_bounds() {
        assert!(DbaseDecimalCount::new(254).is_ok());
        assert!(DbaseDecimalCount::new(255).is_err());
        assert!(DbaseDecimalCount::ZERO.is_zero());
    }

    #[test]
    fn test_field_length_addition() {
        let a = DbaseFieldLength::new(200).unwrap();
        let b = DbaseFieldLength::new(54).unwrap();
        assert_eq!(a.plus(b).unwrap().to_u8(), 254);
        assert!(a.plus(DbaseFieldLength::new(55).unwrap()).is_err());
        assert_eq!(a.to_byte_length().to_i32(), 200);
    }

    #[test]
    fn test_integer_digits_minus_one() {
        assert_eq!(DbaseIntegerDigits::new(5).unwrap().minus_one().to_usize(), 4);
        assert_eq!(DbaseIntegerDigits::ZERO.minus_one(), DbaseIntegerDigits::ZERO);
    }
}
