use std::io::{Read, Write};
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, NaiveTime, SubsecRound};

use super::date::{check_year, decode_text, format_date, parse_date};
use super::{require_field, ValueCell};
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DbaseFieldType, DATE_TIME_LENGTH};

/// Field types that carry the 15-byte timestamp layout.
pub(crate) const DATE_TIME_TYPES: [DbaseFieldType; 2] =
    [DbaseFieldType::DateTime, DbaseFieldType::Character];

/// Parses `yyyyMMddTHHmmss`.
pub(crate) fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if text.len() != usize::from(DATE_TIME_LENGTH) || text.as_bytes()[8] != b'T' {
        return None;
    }
    let date = parse_date(text.get(0..8)?)?;
    let clock = text.get(9..15)?;
    if !clock.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = clock.get(0..2)?.parse().ok()?;
    let minute = clock.get(2..4)?.parse().ok()?;
    let second = clock.get(4..6)?.parse().ok()?;
    Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, second)?))
}

pub(crate) fn format_date_time(value: NaiveDateTime) -> String {
    format!("{}T{}", format_date(value.date()), value.format("%H%M%S"))
}

/// Timestamp stored as `yyyyMMddTHHmmss` in a DateTime or Character field.
///
/// Both type tags share the layout, so the same bytes read back through
/// either. Sub-second precision is dropped on assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseDateTime {
    field: Arc<DbaseField>,
    cell: ValueCell<NaiveDateTime>,
}

impl DbaseDateTime {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        require_field(&field, "date-time", &DATE_TIME_TYPES, Some(DATE_TIME_LENGTH))?;
        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: NaiveDateTime) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(Some(value))?;
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> DbaseResult<Option<NaiveDateTime>> {
        self.cell.get(&self.field)
    }

    pub fn required_value(&self) -> DbaseResult<NaiveDateTime> {
        self.value()?
            .ok_or_else(|| DbaseError::format(self.field.name().as_str(), "value is null"))
    }

    pub fn set_value(&mut self, value: Option<NaiveDateTime>) -> DbaseResult<()> {
        if let Some(dt) = value {
            check_year(&self.field, dt.year())?;
        }
        self.cell = value.map(|dt| dt.trunc_subsecs(0)).into();
        Ok(())
    }

    pub fn accepts_value(&self, value: Option<NaiveDateTime>) -> bool {
        value.map_or(true, |dt| check_year(&self.field, dt.year()).is_ok())
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
        self.cell = decode_text(&bytes, "date-time", parse_date_time);
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        let text = match &self.cell {
            ValueCell::Null => " ".repeat(usize::from(DATE_TIME_LENGTH)),
            ValueCell::Value(dt) => format_date_time(*dt),
            ValueCell::Invalid(reason) => {
                return Err(DbaseError::format(self.field.name().as_str(), reason.clone()))
            }
        };
        io_utils::write_all(writer, text.as_bytes())
    }
}
