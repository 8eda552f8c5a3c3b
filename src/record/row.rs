use std::io::{Read, Write};

use encoding_rs::Encoding;

use crate::errors::{DbaseError, DbaseResult};
use crate::header::END_OF_FILE;
use crate::io_utils;
use crate::primitives::ByteLength;
use crate::schema::{DbaseSchema, DELETED_FLAG_LENGTH};
use crate::values::DbaseFieldValue;

pub const ALIVE_FLAG: u8 = 0x20;
pub const DELETED_FLAG: u8 = 0x2A;

/// One row: a deleted flag and one value per schema field, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseRecord {
    values: Vec<DbaseFieldValue>,
    is_deleted: bool,
}

impl DbaseRecord {
    /// Creates a record of empty values for `schema`.
    pub fn new(schema: &DbaseSchema) -> DbaseResult<Self> {
        Ok(Self::from_values(schema.create_values()?))
    }

    pub fn from_values(values: Vec<DbaseFieldValue>) -> Self {
        Self {
            values,
            is_deleted: false,
        }
    }

    pub fn values(&self) -> &[DbaseFieldValue] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [DbaseFieldValue] {
        &mut self.values
    }

    pub fn value(&self, index: usize) -> Option<&DbaseFieldValue> {
        self.values.get(index)
    }

    pub fn value_mut(&mut self, index: usize) -> Option<&mut DbaseFieldValue> {
        self.values.get_mut(index)
    }

    /// Looks up a value by field name, ignoring ASCII case.
    pub fn value_by_name(&self, name: &str) -> Option<&DbaseFieldValue> {
        self.values.iter().find(|v| v.field().name().matches(name))
    }

    pub fn value_by_name_mut(&mut self, name: &str) -> Option<&mut DbaseFieldValue> {
        self.values.iter_mut().find(|v| v.field().name().matches(name))
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn set_deleted(&mut self, is_deleted: bool) {
        self.is_deleted = is_deleted;
    }

    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }

    /// Encoded length: the deleted flag plus every field.
    pub fn length(&self) -> ByteLength {
        let total: usize = self
            .values
            .iter()
            .map(|v| v.field().length().to_usize())
            .sum();
        // at most 128 fields of 254 bytes
        ByteLength::new(DELETED_FLAG_LENGTH + i32::try_from(total).unwrap_or(i32::MAX - 1))
            .unwrap_or(ByteLength::ZERO)
    }

    /// Whether every value is bound to the schema field at its position.
    pub fn matches_schema(&self, schema: &DbaseSchema) -> bool {
        self.values.len() == schema.field_count()
            && self
                .values
                .iter()
                .zip(schema.fields())
                .all(|(value, field)| value.field() == field.as_ref())
    }

    /// Reads the deleted flag and every value.
    ///
    /// # Errors
    ///
    /// - `DBF_END_OF_FILE_MARKER` if the flag byte is `0x1A`
    /// - `DBF_INVALID_RECORD` for any other unknown flag byte
    /// - `DBF_END_OF_STREAM` if the stream ends before the record does
    pub fn read<R: Read>(&mut self, reader: &mut R, encoding: &'static Encoding) -> DbaseResult<()> {
        let flag = io_utils::read_optional_byte(reader)?
            .ok_or_else(|| DbaseError::end_of_stream("record deleted flag"))?;
        self.read_body(flag, reader, encoding)
    }

    /// Reads the values after a deleted flag that was already consumed.
    pub(crate) fn read_body<R: Read>(
        &mut self,
        flag: u8,
        reader: &mut R,
        encoding: &'static Encoding,
    ) -> DbaseResult<()> {
        self.is_deleted = match flag {
            ALIVE_FLAG => false,
            DELETED_FLAG => true,
            END_OF_FILE => return Err(DbaseError::EndOfFileMarker),
            other => {
                return Err(DbaseError::invalid_record(format!(
                    "unknown deleted flag 0x{other:02X}"
                )))
            }
        };
        for value in &mut self.values {
            value.read(reader, encoding)?;
        }
        Ok(())
    }

    /// Writes the record. Values are encoded in full before anything
    /// reaches `writer`, so a rejected value writes nothing.
    pub fn write<W: Write>(&self, writer: &mut W, encoding: &'static Encoding) -> DbaseResult<()> {
        let mut buf = Vec::with_capacity(self.length().to_usize());
        buf.push(if self.is_deleted { DELETED_FLAG } else { ALIVE_FLAG });
        for value in &self.values {
            value.write(&mut buf, encoding)?;
        }
        io_utils::write_all(writer, &buf)
    }
}
