//! Typed, field-bound cells with fixed-width text encoding
//!
//! Every variant holds a shared reference to the field it is bound to and
//! validates assignments against that field's capacity. Bytes that cannot
//! be parsed are captured on read and surface as a `Format` error only when
//! the typed value is requested.

mod character;
mod date;
mod date_time;
mod date_time_offset;
mod logical;
mod numeric;

use std::io::{Read, Write};
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::errors::{DbaseError, DbaseResult};
use crate::schema::{DbaseField, DbaseFieldType};

pub use character::DbaseCharacter;
pub use date::DbaseDate;
pub use date_time::DbaseDateTime;
pub use date_time_offset::DbaseDateTimeOffset;
pub use logical::{DbaseBoolean, DbaseLogical};
pub use numeric::{
    DbaseDecimal, DbaseFloat, DbaseInt16, DbaseInt32, DbaseNumber, DbaseNumeric, DecimalKind,
    FloatKind, FloatingKind, Int16Kind, Int32Kind, NumberKind, NumericKind,
    NEGATIVE_MIN_LENGTH, POSITIVE_MIN_LENGTH,
};

/// Decoded state of a cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ValueCell<T> {
    Null,
    Value(T),
    /// Bytes were read but do not match the variant's grammar
    Invalid(String),
}

impl<T: Clone> ValueCell<T> {
    pub(crate) fn get(&self, field: &DbaseField) -> DbaseResult<Option<T>> {
        match self {
            ValueCell::Null => Ok(None),
            ValueCell::Value(value) => Ok(Some(value.clone())),
            ValueCell::Invalid(reason) => {
                Err(DbaseError::format(field.name().as_str(), reason.clone()))
            }
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        matches!(self, ValueCell::Null)
    }
}

impl<T> From<Option<T>> for ValueCell<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ValueCell::Value(value),
            None => ValueCell::Null,
        }
    }
}

/// Rejects binding `variant` to a field of the wrong type or width.
pub(crate) fn require_field(
    field: &DbaseField,
    variant: &'static str,
    types: &[DbaseFieldType],
    length: Option<u8>,
) -> DbaseResult<()> {
    if !types.contains(&field.field_type()) {
        return Err(DbaseError::invalid_value(
            field.name().as_str(),
            variant,
            format!("field type {} is not supported", field.field_type()),
        ));
    }
    if let Some(expected) = length {
        if field.length().to_u8() != expected {
            return Err(DbaseError::invalid_value(
                field.name().as_str(),
                variant,
                format!("field length must be {expected}, got {}", field.length()),
            ));
        }
    }
    if !field.decimal_count().is_zero() {
        return Err(DbaseError::invalid_value(
            field.name().as_str(),
            variant,
            format!("decimal count must be 0, got {}", field.decimal_count()),
        ));
    }
    Ok(())
}

/// A value of any variant.
///
/// `for_field` picks the default variant for a field type; the other
/// variants are built explicitly and wrapped with `From`.
#[derive(Debug, Clone, PartialEq)]
pub enum DbaseFieldValue {
    Character(DbaseCharacter),
    Number(DbaseNumber),
    Float(DbaseFloat),
    Decimal(DbaseDecimal),
    Int16(DbaseInt16),
    Int32(DbaseInt32),
    Date(DbaseDate),
    DateTime(DbaseDateTime),
    DateTimeOffset(DbaseDateTimeOffset),
    Logical(DbaseLogical),
    Boolean(DbaseBoolean),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            DbaseFieldValue::Character($inner) => $body,
            DbaseFieldValue::Number($inner) => $body,
            DbaseFieldValue::Float($inner) => $body,
            DbaseFieldValue::Decimal($inner) => $body,
            DbaseFieldValue::Int16($inner) => $body,
            DbaseFieldValue::Int32($inner) => $body,
            DbaseFieldValue::Date($inner) => $body,
            DbaseFieldValue::DateTime($inner) => $body,
            DbaseFieldValue::DateTimeOffset($inner) => $body,
            DbaseFieldValue::Logical($inner) => $body,
            DbaseFieldValue::Boolean($inner) => $body,
        }
    };
}

impl DbaseFieldValue {
    /// Builds an empty value of the default variant for the field's type.
    pub fn for_field(field: Arc<DbaseField>) -> DbaseResult<Self> {
        Ok(match field.field_type() {
            DbaseFieldType::Character => DbaseCharacter::new(field)?.into(),
            DbaseFieldType::Number => DbaseNumber::new(field)?.into(),
            DbaseFieldType::Float => DbaseFloat::new(field)?.into(),
            DbaseFieldType::Date => DbaseDate::new(field)?.into(),
            DbaseFieldType::Logical => DbaseLogical::new(field)?.into(),
            DbaseFieldType::DateTime => DbaseDateTime::new(field)?.into(),
        })
    }

    pub fn field(&self) -> &DbaseField {
        dispatch!(self, v => v.field())
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            DbaseFieldValue::Character(_) => "character",
            DbaseFieldValue::Number(_) => DbaseNumber::VARIANT,
            DbaseFieldValue::Float(_) => DbaseFloat::VARIANT,
            DbaseFieldValue::Decimal(_) => DbaseDecimal::VARIANT,
            DbaseFieldValue::Int16(_) => DbaseInt16::VARIANT,
            DbaseFieldValue::Int32(_) => DbaseInt32::VARIANT,
            DbaseFieldValue::Date(_) => "date",
            DbaseFieldValue::DateTime(_) => "date-time",
            DbaseFieldValue::DateTimeOffset(_) => "date-time-offset",
            DbaseFieldValue::Logical(_) => "logical",
            DbaseFieldValue::Boolean(_) => "boolean",
        }
    }

    pub fn has_value(&self) -> bool {
        dispatch!(self, v => v.has_value())
    }

    /// Clears the value back to null.
    pub fn reset(&mut self) {
        dispatch!(self, v => v.reset())
    }

    /// Reads exactly `field.length` bytes into this value.
    pub fn read<R: Read>(&mut self, reader: &mut R, encoding: &'static Encoding) -> DbaseResult<()> {
        match self {
            DbaseFieldValue::Character(v) => v.read(reader, encoding),
            DbaseFieldValue::Number(v) => v.read(reader),
            DbaseFieldValue::Float(v) => v.read(reader),
            DbaseFieldValue::Decimal(v) => v.read(reader),
            DbaseFieldValue::Int16(v) => v.read(reader),
            DbaseFieldValue::Int32(v) => v.read(reader),
            DbaseFieldValue::Date(v) => v.read(reader),
            DbaseFieldValue::DateTime(v) => v.read(reader),
            DbaseFieldValue::DateTimeOffset(v) => v.read(reader),
            DbaseFieldValue::Logical(v) => v.read(reader),
            DbaseFieldValue::Boolean(v) => v.read(reader),
        }
    }

    /// Writes exactly `field.length` bytes.
    pub fn write<W: Write>(&self, writer: &mut W, encoding: &'static Encoding) -> DbaseResult<()> {
        match self {
            DbaseFieldValue::Character(v) => v.write(writer, encoding),
            DbaseFieldValue::Number(v) => v.write(writer),
            DbaseFieldValue::Float(v) => v.write(writer),
            DbaseFieldValue::Decimal(v) => v.write(writer),
            DbaseFieldValue::Int16(v) => v.write(writer),
            DbaseFieldValue::Int32(v) => v.write(writer),
            DbaseFieldValue::Date(v) => v.write(writer),
            DbaseFieldValue::DateTime(v) => v.write(writer),
            DbaseFieldValue::DateTimeOffset(v) => v.write(writer),
            DbaseFieldValue::Logical(v) => v.write(writer),
            DbaseFieldValue::Boolean(v) => v.write(writer),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for DbaseFieldValue {
                fn from(value: $ty) -> Self {
                    DbaseFieldValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Character(DbaseCharacter),
    Number(DbaseNumber),
    Float(DbaseFloat),
    Decimal(DbaseDecimal),
    Int16(DbaseInt16),
    Int32(DbaseInt32),
    Date(DbaseDate),
    DateTime(DbaseDateTime),
    DateTimeOffset(DbaseDateTimeOffset),
    Logical(DbaseLogical),
    Boolean(DbaseBoolean),
);
