//! Column descriptor with per-type structural rules.
//!
//! | Type       | Length | Decimal count          |
//! |------------|--------|------------------------|
//! | Character  | 0..254 | 0                      |
//! | Number     | 1..18  | 0, or 1..=(length - 2) |
//! | Float      | 1..20  | 0, or 1..=(length - 2) |
//! | Date       | 8      | 0                      |
//! | Logical    | 1      | 0                      |
//! | DateTime   | 15     | 0                      |
//!
//! Violations fail at construction, never lazily.

use std::sync::Arc;

use super::field_name::DbaseFieldName;
use super::field_type::DbaseFieldType;
use crate::errors::{DbaseError, DbaseResult};
use crate::primitives::{ByteOffset, DbaseDecimalCount, DbaseFieldLength, DbaseIntegerDigits};
use crate::values::DbaseFieldValue;

pub const NUMBER_MAX_LENGTH: u8 = 18;
pub const FLOAT_MAX_LENGTH: u8 = 20;
pub const DATE_LENGTH: u8 = 8;
pub const LOGICAL_LENGTH: u8 = 1;
pub const DATE_TIME_LENGTH: u8 = 15;

/// Describes one column of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbaseField {
    name: DbaseFieldName,
    field_type: DbaseFieldType,
    offset: ByteOffset,
    length: DbaseFieldLength,
    decimal_count: DbaseDecimalCount,
    positive_integer_digits: DbaseIntegerDigits,
    negative_integer_digits: DbaseIntegerDigits,
}

impl DbaseField {
    /// Creates a field, enforcing the rules of its type.
    pub fn new(
        name: DbaseFieldName,
        field_type: DbaseFieldType,
        offset: ByteOffset,
        length: DbaseFieldLength,
        decimal_count: DbaseDecimalCount,
    ) -> DbaseResult<Self> {
        validate_layout(&name, field_type, length, decimal_count)?;

        let positive_integer_digits = if decimal_count.is_zero() {
            DbaseIntegerDigits::new(i32::from(length.to_u8()))?
        } else {
            // one position for the decimal point
            DbaseIntegerDigits::new(
                i32::from(length.to_u8()) - 1 - i32::from(decimal_count.to_u8()),
            )?
        };
        // the sign consumes one position
        let negative_integer_digits = positive_integer_digits.minus_one();

        Ok(Self {
            name,
            field_type,
            offset,
            length,
            decimal_count,
            positive_integer_digits,
            negative_integer_digits,
        })
    }

    fn create(
        name: &str,
        field_type: DbaseFieldType,
        length: i32,
        decimal_count: i32,
    ) -> DbaseResult<Self> {
        let name = DbaseFieldName::new(name)?;
        let length = DbaseFieldLength::new(length)
            .map_err(|e| DbaseError::invalid_field(name.as_str(), e.to_string()))?;
        let decimal_count = DbaseDecimalCount::new(decimal_count)
            .map_err(|e| DbaseError::invalid_field(name.as_str(), e.to_string()))?;
        Self::new(name, field_type, ByteOffset::INITIAL, length, decimal_count)
    }

    pub fn create_character_field(name: &str, length: i32) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Character, length, 0)
    }

    pub fn create_number_field(name: &str, length: i32, decimal_count: i32) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Number, length, decimal_count)
    }

    pub fn create_float_field(name: &str, length: i32, decimal_count: i32) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Float, length, decimal_count)
    }

    pub fn create_date_field(name: &str) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Date, i32::from(DATE_LENGTH), 0)
    }

    pub fn create_logical_field(name: &str) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Logical, i32::from(LOGICAL_LENGTH), 0)
    }

    pub fn create_date_time_field(name: &str) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::DateTime, i32::from(DATE_TIME_LENGTH), 0)
    }

    /// Date-time-with-offset columns are physically character columns.
    pub fn create_date_time_offset_field(name: &str) -> DbaseResult<Self> {
        Self::create(name, DbaseFieldType::Character, i32::from(DATE_TIME_LENGTH), 0)
    }

    pub fn name(&self) -> &DbaseFieldName {
        &self.name
    }

    pub fn field_type(&self) -> DbaseFieldType {
        self.field_type
    }

    pub fn offset(&self) -> ByteOffset {
        self.offset
    }

    pub fn length(&self) -> DbaseFieldLength {
        self.length
    }

    pub fn decimal_count(&self) -> DbaseDecimalCount {
        self.decimal_count
    }

    /// Whole-number digits available to non-negative values.
    pub fn positive_integer_digits(&self) -> DbaseIntegerDigits {
        self.positive_integer_digits
    }

    /// Whole-number digits available to negative values.
    pub fn negative_integer_digits(&self) -> DbaseIntegerDigits {
        self.negative_integer_digits
    }

    /// Offset of the first byte after this field.
    pub fn end_offset(&self) -> DbaseResult<ByteOffset> {
        self.offset.plus(self.length.to_byte_length())
    }

    /// Returns a copy repositioned at `offset`.
    pub fn at(&self, offset: ByteOffset) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    /// Returns a copy positioned immediately after `previous`.
    pub fn after(&self, previous: &DbaseField) -> DbaseResult<Self> {
        Ok(self.at(previous.end_offset()?))
    }

    /// Builds the value variant matching this field's type.
    pub fn create_field_value(&self) -> DbaseResult<DbaseFieldValue> {
        DbaseFieldValue::for_field(Arc::new(self.clone()))
    }
}

fn validate_layout(
    name: &DbaseFieldName,
    field_type: DbaseFieldType,
    length: DbaseFieldLength,
    decimal_count: DbaseDecimalCount,
) -> DbaseResult<()> {
    let reject = |reason: String| Err(DbaseError::invalid_field(name.as_str(), reason));
    let length = length.to_u8();
    let decimals = decimal_count.to_u8();

    match field_type {
        DbaseFieldType::Character => {
            if decimals != 0 {
                return reject(format!("character field must have 0 decimals, got {decimals}"));
            }
        }
        DbaseFieldType::Number | DbaseFieldType::Float => {
            let max = if field_type == DbaseFieldType::Number {
                NUMBER_MAX_LENGTH
            } else {
                FLOAT_MAX_LENGTH
            };
            if length < 1 || length > max {
                return reject(format!(
                    "{field_type} field length must be 1..={max}, got {length}"
                ));
            }
            if decimals != 0 && u16::from(decimals) + 2 > u16::from(length) {
                return reject(format!(
                    "{field_type} field of length {length} allows at most {} decimals, got {decimals}",
                    length.saturating_sub(2)
                ));
            }
        }
        DbaseFieldType::Date | DbaseFieldType::Logical | DbaseFieldType::DateTime => {
            let expected = match field_type {
                DbaseFieldType::Date => DATE_LENGTH,
                DbaseFieldType::Logical => LOGICAL_LENGTH,
                _ => DATE_TIME_LENGTH,
            };
            if length != expected {
                return reject(format!(
                    "{field_type} field length must be {expected}, got {length}"
                ));
            }
            if decimals != 0 {
                return reject(format!(
                    "{field_type} field must have 0 decimals, got {decimals}"
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;

    fn field(field_type: DbaseFieldType, length: i32, decimals: i32) -> DbaseResult<DbaseField> {
        DbaseField::create("TEST", field_type, length, decimals)
    }

    #[test]
    fn test_character_rules() {
        assert!(field(DbaseFieldType::Character, 0, 0).is_ok());
        assert!(field(DbaseFieldType::Character, 254, 0).is_ok());
        assert!(field(DbaseFieldType::Character, 255, 0).is_err());
        assert!(field(DbaseFieldType::Character, 10, 1).is_err());
    }

    #[test]
    fn test_number_rules() {
        assert!(field(DbaseFieldType::Number, 1, 0).is_ok());
        assert!(field(DbaseFieldType::Number, 18, 0).is_ok());
        assert!(field(DbaseFieldType::Number, 19, 0).is_err());
        assert!(field(DbaseFieldType::Number, 0, 0).is_err());
        assert!(field(DbaseFieldType::Number, 10, 8).is_ok());
        // decimal >= length - 1 rejected
        assert!(field(DbaseFieldType::Number, 10, 9).is_err());
        assert!(field(DbaseFieldType::Number, 10, 10).is_err());
        assert!(field(DbaseFieldType::Number, 2, 1).is_err());
    }

    #[test]
    fn test_float_rules() {
        assert!(field(DbaseFieldType::Float, 20, 0).is_ok());
        assert!(field(DbaseFieldType::Float, 21, 0).is_err());
        assert!(field(DbaseFieldType::Float, 20, 18).is_ok());
        assert!(field(DbaseFieldType::Float, 20, 19).is_err());
    }

    #[test]
    fn test_fixed_width_types() {
        assert!(field(DbaseFieldType::Date, 8, 0).is_ok());
        assert!(field(DbaseFieldType::Date, 9, 0).is_err());
        assert!(field(DbaseFieldType::Date, 8, 1).is_err());
        assert!(field(DbaseFieldType::Logical, 1, 0).is_ok());
        assert!(field(DbaseFieldType::Logical, 2, 0).is_err());
        assert!(field(DbaseFieldType::DateTime, 15, 0).is_ok());
        assert!(field(DbaseFieldType::DateTime, 14, 0).is_err());
    }

    #[test]
    fn test_rejection_code() {
        let err = field(DbaseFieldType::Logical, 3, 0).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::InvalidField);
        assert!(err.to_string().contains("TEST"));
    }

    #[test]
    fn test_integer_digits_without_decimals() {
        let f = DbaseField::create_number_field("AMOUNT", 10, 0).unwrap();
        assert_eq!(f.positive_integer_digits().to_usize(), 10);
        assert_eq!(f.negative_integer_digits().to_usize(), 9);
    }

    #[test]
    fn test_integer_digits_with_decimals() {
        let f = DbaseField::create_number_field("AMOUNT", 10, 4).unwrap();
        assert_eq!(f.positive_integer_digits().to_usize(), 5);
        assert_eq!(f.negative_integer_digits().to_usize(), 4);
    }

    #[test]
    fn test_zero_length_character_has_no_digits() {
        let f = DbaseField::create_character_field("EMPTY", 0).unwrap();
        assert_eq!(f.positive_integer_digits().to_usize(), 0);
        assert_eq!(f.negative_integer_digits().to_usize(), 0);
    }

    #[test]
    fn test_after_and_at() {
        let first = DbaseField::create_character_field("NAME", 20).unwrap();
        let second = DbaseField::create_number_field("AGE", 3, 0)
            .unwrap()
            .after(&first)
            .unwrap();
        assert_eq!(second.offset().to_i32(), 20);
        assert_eq!(second.end_offset().unwrap().to_i32(), 23);

        let moved = second.at(ByteOffset::new(100).unwrap());
        assert_eq!(moved.offset().to_i32(), 100);
        assert_eq!(moved.name(), second.name());
        assert_eq!(second.offset().to_i32(), 20);
    }

    #[test]
    fn test_date_time_offset_field_is_character() {
        let f = DbaseField::create_date_time_offset_field("STAMP").unwrap();
        assert_eq!(f.field_type(), DbaseFieldType::Character);
        assert_eq!(f.length().to_u8(), 15);
    }
}
