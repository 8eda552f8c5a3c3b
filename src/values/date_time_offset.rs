use std::io::{Read, Write};
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Offset, SubsecRound, TimeZone, Utc};

use super::date::{check_year, decode_text};
use super::date_time::{format_date_time, parse_date_time, DATE_TIME_TYPES};
use super::{require_field, ValueCell};
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DATE_TIME_LENGTH};

/// Instant with offset, stored as its UTC timestamp.
///
/// The offset is not part of the layout: values read back carry `+00:00`.
/// Unlike the plain date-time a null cell has no value to return, so
/// `value` fails with `Format` until one is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseDateTimeOffset {
    field: Arc<DbaseField>,
    cell: ValueCell<DateTime<FixedOffset>>,
}

fn utc(value: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    value.with_timezone(&Utc.fix()).trunc_subsecs(0)
}

impl DbaseDateTimeOffset {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        require_field(
            &field,
            "date-time-offset",
            &DATE_TIME_TYPES,
            Some(DATE_TIME_LENGTH),
        )?;
        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: DateTime<FixedOffset>) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(value)?;
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> DbaseResult<DateTime<FixedOffset>> {
        self.cell
            .get(&self.field)?
            .ok_or_else(|| DbaseError::format(self.field.name().as_str(), "value is null"))
    }

    pub fn set_value(&mut self, value: DateTime<FixedOffset>) -> DbaseResult<()> {
        let normalized = utc(value);
        check_year(&self.field, normalized.year())?;
        self.cell = ValueCell::Value(normalized);
        Ok(())
    }

    pub fn accepts_value(&self, value: DateTime<FixedOffset>) -> bool {
        check_year(&self.field, utc(value).year()).is_ok()
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
        self.cell = match decode_text(&bytes, "date-time", parse_date_time) {
            ValueCell::Value(naive) => ValueCell::Value(Utc.fix().from_utc_datetime(&naive)),
            ValueCell::Null => ValueCell::Null,
            ValueCell::Invalid(reason) => ValueCell::Invalid(reason),
        };
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        let text = match &self.cell {
            ValueCell::Null => " ".repeat(usize::from(DATE_TIME_LENGTH)),
            ValueCell::Value(dt) => format_date_time(dt.naive_utc()),
            ValueCell::Invalid(reason) => {
                return Err(DbaseError::format(self.field.name().as_str(), reason.clone()))
            }
        };
        io_utils::write_all(writer, text.as_bytes())
    }
}
