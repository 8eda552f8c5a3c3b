//! Fixed-width numeric values.
//!
//! Values are written as ASCII, right-justified and space-padded to the
//! field length. The fraction is cut or zero-padded to exactly the field's
//! decimal count; it is never rounded. Null is written as spaces.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::ValueCell;
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DbaseFieldType};

/// Narrowest field that holds a non-negative value with one decimal.
pub const POSITIVE_MIN_LENGTH: u8 = 3;
/// Narrowest field that holds a negative value with one decimal.
pub const NEGATIVE_MIN_LENGTH: u8 = 4;

/// Per-variant numeric rules.
pub trait NumericKind {
    type Value: Copy + PartialEq + fmt::Debug;

    const NAME: &'static str;
    const MAX_LENGTH: u8;
    const MAX_DECIMAL_COUNT: u8;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool;

    fn parse(text: &str) -> Option<Self::Value>;

    /// Plain decimal text without exponent, `None` when not finite.
    fn to_plain(value: Self::Value) -> Option<String>;
}

/// Binary floating point kinds that also convert to and from integers.
pub trait FloatingKind: NumericKind {
    fn to_f64(value: Self::Value) -> f64;
    fn from_i32(value: i32) -> Self::Value;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int16Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int32Kind;

impl NumericKind for NumberKind {
    type Value = f64;

    const NAME: &'static str = "number";
    const MAX_LENGTH: u8 = 18;
    const MAX_DECIMAL_COUNT: u8 = 15;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool {
        field_type == DbaseFieldType::Number
    }

    fn parse(text: &str) -> Option<f64> {
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn to_plain(value: f64) -> Option<String> {
        value.is_finite().then(|| value.to_string())
    }
}

impl FloatingKind for NumberKind {
    fn to_f64(value: f64) -> f64 {
        value
    }

    fn from_i32(value: i32) -> f64 {
        f64::from(value)
    }
}

impl NumericKind for FloatKind {
    type Value = f32;

    const NAME: &'static str = "float";
    const MAX_LENGTH: u8 = 20;
    const MAX_DECIMAL_COUNT: u8 = 7;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool {
        field_type == DbaseFieldType::Float
    }

    fn parse(text: &str) -> Option<f32> {
        text.parse::<f32>().ok().filter(|v| v.is_finite())
    }

    fn to_plain(value: f32) -> Option<String> {
        value.is_finite().then(|| value.to_string())
    }
}

impl FloatingKind for FloatKind {
    fn to_f64(value: f32) -> f64 {
        f64::from(value)
    }

    fn from_i32(value: i32) -> f32 {
        // i32 values past 2^24 lose precision, same as a cast
        value as f32
    }
}

impl NumericKind for DecimalKind {
    type Value = Decimal;

    const NAME: &'static str = "decimal";
    const MAX_LENGTH: u8 = 18;
    const MAX_DECIMAL_COUNT: u8 = 15;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool {
        field_type == DbaseFieldType::Number
    }

    fn parse(text: &str) -> Option<Decimal> {
        Decimal::from_str(text).ok()
    }

    fn to_plain(value: Decimal) -> Option<String> {
        Some(value.to_string())
    }
}

impl NumericKind for Int16Kind {
    type Value = i16;

    const NAME: &'static str = "int16";
    // "-32768"
    const MAX_LENGTH: u8 = 6;
    const MAX_DECIMAL_COUNT: u8 = 0;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool {
        matches!(field_type, DbaseFieldType::Number | DbaseFieldType::Float)
    }

    fn parse(text: &str) -> Option<i16> {
        text.parse().ok()
    }

    fn to_plain(value: i16) -> Option<String> {
        Some(value.to_string())
    }
}

impl NumericKind for Int32Kind {
    type Value = i32;

    const NAME: &'static str = "int32";
    // "-2147483648"
    const MAX_LENGTH: u8 = 11;
    const MAX_DECIMAL_COUNT: u8 = 0;

    fn accepts_field_type(field_type: DbaseFieldType) -> bool {
        matches!(field_type, DbaseFieldType::Number | DbaseFieldType::Float)
    }

    fn parse(text: &str) -> Option<i32> {
        text.parse().ok()
    }

    fn to_plain(value: i32) -> Option<String> {
        Some(value.to_string())
    }
}

/// Double-backed value of a Number field.
pub type DbaseNumber = DbaseNumeric<NumberKind>;
/// Single-backed value of a Float field.
pub type DbaseFloat = DbaseNumeric<FloatKind>;
/// Exact decimal value of a Number field.
pub type DbaseDecimal = DbaseNumeric<DecimalKind>;
pub type DbaseInt16 = DbaseNumeric<Int16Kind>;
pub type DbaseInt32 = DbaseNumeric<Int32Kind>;

/// A nullable numeric cell bound to a Number or Float field.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseNumeric<K: NumericKind> {
    field: Arc<DbaseField>,
    cell: ValueCell<K::Value>,
}

impl<K: NumericKind> DbaseNumeric<K> {
    pub const VARIANT: &'static str = K::NAME;

    /// Binds an empty value to `field`.
    ///
    /// Fails with `InvalidValue` when the field's type, length or decimal
    /// count is outside what this variant can represent.
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        let reject = |reason: String| {
            Err(DbaseError::invalid_value(
                field.name().as_str(),
                K::NAME,
                reason,
            ))
        };

        if !K::accepts_field_type(field.field_type()) {
            return reject(format!(
                "field type {} is not supported",
                field.field_type()
            ));
        }
        if field.length().to_u8() > K::MAX_LENGTH {
            return reject(format!(
                "field length {} exceeds {}",
                field.length(),
                K::MAX_LENGTH
            ));
        }
        if field.decimal_count().to_u8() > K::MAX_DECIMAL_COUNT {
            return reject(format!(
                "decimal count {} exceeds {}",
                field.decimal_count(),
                K::MAX_DECIMAL_COUNT
            ));
        }

        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: K::Value) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(Some(value))?;
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    /// Returns the value, or `Format` when the bytes read were not a number.
    pub fn value(&self) -> DbaseResult<Option<K::Value>> {
        self.cell.get(&self.field)
    }

    /// Like `value`, but null is also a `Format` error.
    pub fn required_value(&self) -> DbaseResult<K::Value> {
        self.value()?.ok_or_else(|| {
            DbaseError::format(self.field.name().as_str(), "value is null")
        })
    }

    /// Assigns a value, failing with `Range` when it does not fit the field.
    /// The current value is untouched on failure.
    pub fn set_value(&mut self, value: Option<K::Value>) -> DbaseResult<()> {
        if let Some(v) = value {
            encode::<K>(&self.field, v)?;
        }
        self.cell = value.into();
        Ok(())
    }

    pub fn accepts_value(&self, value: Option<K::Value>) -> bool {
        value.map_or(true, |v| encode::<K>(&self.field, v).is_ok())
    }

    pub fn has_value(&self) -> bool {
        !self.cell.is_null()
    }

    pub fn reset(&mut self) {
        self.cell = ValueCell::Null;
    }

    /// Reads the field's bytes. Unparseable text is kept and reported
    /// by `value`.
    pub fn read<R: Read>(&mut self, reader: &mut R) -> DbaseResult<()> {
        let bytes = io_utils::read_vec(
            reader,
            self.field.length().to_usize(),
            self.field.name().as_str(),
        )?;
        self.cell = decode::<K>(&bytes);
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        let text = match &self.cell {
            ValueCell::Null => " ".repeat(self.field.length().to_usize()),
            ValueCell::Value(v) => encode::<K>(&self.field, *v)?,
            ValueCell::Invalid(reason) => {
                return Err(DbaseError::format(self.field.name().as_str(), reason.clone()))
            }
        };
        io_utils::write_all(writer, text.as_bytes())
    }
}

impl<K: FloatingKind> DbaseNumeric<K> {
    fn integral(&self) -> Option<f64> {
        match self.value() {
            Ok(Some(v)) => Some(K::to_f64(v).trunc()),
            _ => None,
        }
    }

    /// Whole part of the value as `i16`; `None` when null, unreadable or
    /// outside the `i16` range.
    pub fn try_get_as_int16(&self) -> Option<i16> {
        self.integral()
            .filter(|v| (f64::from(i16::MIN)..=f64::from(i16::MAX)).contains(v))
            .map(|v| v as i16)
    }

    pub fn try_get_as_int32(&self) -> Option<i32> {
        self.integral()
            .filter(|v| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(v))
            .map(|v| v as i32)
    }

    /// Assigns an `i16`, returning false when it does not fit the field.
    pub fn try_set_as_int16(&mut self, value: i16) -> bool {
        self.set_value(Some(K::from_i32(i32::from(value)))).is_ok()
    }

    pub fn try_set_as_int32(&mut self, value: i32) -> bool {
        self.set_value(Some(K::from_i32(value))).is_ok()
    }

    pub fn get_as_int16(&self) -> DbaseResult<i16> {
        let value = self.required_value()?;
        self.try_get_as_int16().ok_or_else(|| {
            DbaseError::format(
                self.field.name().as_str(),
                format!("{value:?} is not representable as int16"),
            )
        })
    }

    pub fn get_as_int32(&self) -> DbaseResult<i32> {
        let value = self.required_value()?;
        self.try_get_as_int32().ok_or_else(|| {
            DbaseError::format(
                self.field.name().as_str(),
                format!("{value:?} is not representable as int32"),
            )
        })
    }

    pub fn set_as_int16(&mut self, value: i16) -> DbaseResult<()> {
        self.set_as_integer(i32::from(value))
    }

    pub fn set_as_int32(&mut self, value: i32) -> DbaseResult<()> {
        self.set_as_integer(value)
    }

    fn set_as_integer(&mut self, value: i32) -> DbaseResult<()> {
        self.set_value(Some(K::from_i32(value))).map_err(|e| {
            DbaseError::format(self.field.name().as_str(), e.to_string())
        })
    }
}

/// Sign, whole digits and fraction digits of a value cut to a decimal count.
#[derive(Debug, PartialEq, Eq)]
struct FixedPoint {
    negative: bool,
    integer: String,
    fraction: String,
}

impl FixedPoint {
    fn from_plain(plain: &str, decimal_count: usize) -> Self {
        let (negative, digits) = match plain.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, plain.strip_prefix('+').unwrap_or(plain)),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let integer = match integer.trim_start_matches('0') {
            "" => "0".to_string(),
            trimmed => trimmed.to_string(),
        };
        let mut fraction: String = fraction.chars().take(decimal_count).collect();
        while fraction.len() < decimal_count {
            fraction.push('0');
        }

        // a value cut down to zero is written unsigned
        let is_zero = integer == "0" && fraction.bytes().all(|b| b == b'0');

        Self {
            negative: negative && !is_zero,
            integer,
            fraction,
        }
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.integer)?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

/// Formats `value` to exactly `field.length` characters.
fn encode<K: NumericKind>(field: &DbaseField, value: K::Value) -> DbaseResult<String> {
    let name = field.name().as_str();
    let plain = K::to_plain(value)
        .ok_or_else(|| DbaseError::range(name, format!("{value:?} is not finite")))?;
    let fixed = FixedPoint::from_plain(&plain, field.decimal_count().to_usize());

    let capacity = if fixed.negative {
        field.negative_integer_digits()
    } else {
        field.positive_integer_digits()
    };
    if fixed.integer.len() > capacity.to_usize() {
        return Err(DbaseError::range(
            name,
            format!(
                "{value:?} needs {} integer digits, field holds {capacity}",
                fixed.integer.len()
            ),
        ));
    }

    let text = fixed.to_string();
    let width = field.length().to_usize();
    if text.len() > width {
        return Err(DbaseError::range(
            name,
            format!("{text:?} is wider than {width} characters"),
        ));
    }
    Ok(format!("{text:>width$}"))
}

fn decode<K: NumericKind>(bytes: &[u8]) -> ValueCell<K::Value> {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return ValueCell::Invalid(format!("{bytes:?} is not ASCII text"));
    };
    let text = text.trim_matches(|c| c == ' ' || c == '\0');
    if text.is_empty() {
        return ValueCell::Null;
    }
    match K::parse(text) {
        Some(value) => ValueCell::Value(value),
        None => ValueCell::Invalid(format!("{text:?} is not a valid {}", K::NAME)),
    }
}
