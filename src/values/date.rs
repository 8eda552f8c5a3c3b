use std::io::{Read, Write};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::{require_field, ValueCell};
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DbaseFieldType, DATE_LENGTH};

/// Earliest year that fits the four-digit text layout.
pub(crate) const MIN_YEAR: i32 = 1;
pub(crate) const MAX_YEAR: i32 = 9999;

pub(crate) fn check_year(field: &DbaseField, year: i32) -> DbaseResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DbaseError::range(
            field.name().as_str(),
            format!("year {year} is outside {MIN_YEAR}..={MAX_YEAR}"),
        ));
    }
    Ok(())
}

fn digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses `yyyyMMdd`.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 {
        return None;
    }
    let year = digits(text.get(0..4)?)?;
    let month = digits(text.get(4..6)?)?;
    let day = digits(text.get(6..8)?)?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Decodes fixed-width text: blank is null, anything else unparseable
/// is kept as an invalid cell.
pub(crate) fn decode_text<T>(
    bytes: &[u8],
    what: &str,
    parse: fn(&str) -> Option<T>,
) -> ValueCell<T> {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return ValueCell::Invalid(format!("{bytes:?} is not ASCII text"));
    };
    let trimmed = text.trim_matches(|c| c == ' ' || c == '\0');
    if trimmed.is_empty() {
        return ValueCell::Null;
    }
    match parse(trimmed) {
        Some(value) => ValueCell::Value(value),
        None => ValueCell::Invalid(format!("{trimmed:?} is not a valid {what}")),
    }
}

/// Calendar date of a Date field, stored as `yyyyMMdd`.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseDate {
    field: Arc<DbaseField>,
    cell: ValueCell<NaiveDate>,
}

impl DbaseDate {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        require_field(&field, "date", &[DbaseFieldType::Date], Some(DATE_LENGTH))?;
        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: NaiveDate) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(Some(value))?;
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> DbaseResult<Option<NaiveDate>> {
        self.cell.get(&self.field)
    }

    pub fn required_value(&self) -> DbaseResult<NaiveDate> {
        self.value()?
            .ok_or_else(|| DbaseError::format(self.field.name().as_str(), "value is null"))
    }

    pub fn set_value(&mut self, value: Option<NaiveDate>) -> DbaseResult<()> {
        if let Some(date) = value {
            check_year(&self.field, date.year())?;
        }
        self.cell = value.into();
        Ok(())
    }

    /// Assigns the date part; the time of day is dropped.
    pub fn set_date_time(&mut self, value: Option<NaiveDateTime>) -> DbaseResult<()> {
        self.set_value(value.map(|dt| dt.date()))
    }

    pub fn accepts_value(&self, value: Option<NaiveDate>) -> bool {
        value.map_or(true, |date| check_year(&self.field, date.year()).is_ok())
    }

    pub fn has_value(&self) -> bool {
        !self.cell.is_null()
    }

    pub fn reset(&mut self) {
        self.cell = ValueCell::Null;
    }

    pub fn read<R: Read>(&mut self, reader: &mut R) -> DbaseResult<()> {
        let bytes = io_utils::read_vec(
            reader,
            self.field.length().to_usize(),
            self.field.name().as_str(),
        )?;
        self.cell = decode_text(&bytes, "date", parse_date);
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        let text = match &self.cell {
            ValueCell::Null => " ".repeat(usize::from(DATE_LENGTH)),
            ValueCell::Value(date) => format_date(*date),
            ValueCell::Invalid(reason) => {
                return Err(DbaseError::format(self.field.name().as_str(), reason.clone()))
            }
        };
        io_utils::write_all(writer, text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;
    use std::io::Cursor;

    fn field() -> Arc<DbaseField> {
        Arc::new(DbaseField::create_date_field("BORN").unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_layout() {
        let value = DbaseDate::with_value(field(), date(2024, 3, 9)).unwrap();
        let mut out = Vec::new();
        value.write(&mut out).unwrap();
        assert_eq!(out, b"20240309");
    }

    #[test]
    fn test_time_of_day_is_truncated() {
        let mut value = DbaseDate::new(field()).unwrap();
        let dt = date(1999, 12, 31).and_hms_opt(23, 59, 59).unwrap();
        value.set_date_time(Some(dt)).unwrap();
        assert_eq!(value.value().unwrap(), Some(date(1999, 12, 31)));
    }

    #[test]
    fn test_round_trip_and_null() {
        let mut value = DbaseDate::new(field()).unwrap();
        value.read(&mut Cursor::new(b"19700101".to_vec())).unwrap();
        assert_eq!(value.required_value().unwrap(), date(1970, 1, 1));

        value.read(&mut Cursor::new(b"        ".to_vec())).unwrap();
        assert!(!value.has_value());
        let mut out = Vec::new();
        value.write(&mut out).unwrap();
        assert_eq!(out, b"        ");
    }

    #[test]
    fn test_invalid_date_fails_lazily() {
        let mut value = DbaseDate::new(field()).unwrap();
        value.read(&mut Cursor::new(b"20240230".to_vec())).unwrap();
        assert_eq!(value.value().unwrap_err().code(), DbaseErrorCode::Format);

        value.read(&mut Cursor::new(b"2024-3-9".to_vec())).unwrap();
        assert!(value.value().is_err());
    }

    #[test]
    fn test_year_outside_text_layout_rejected() {
        let mut value = DbaseDate::new(field()).unwrap();
        let err = value.set_value(Some(date(10_000, 1, 1))).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::Range);
        assert!(!value.accepts_value(Some(date(0, 1, 1))));
    }

    #[test]
    fn test_parse_date_requires_digits() {
        assert_eq!(parse_date("20240309"), Some(date(2024, 3, 9)));
        assert_eq!(parse_date("2024030"), None);
        assert_eq!(parse_date("2024+309"), None);
    }
}
