//! Single-byte logical values.
//!
//! | Byte                 | Value |
//! |----------------------|-------|
//! | `y` `Y` `t` `T`      | true  |
//! | `n` `N` `f` `F`      | false |
//! | `?` or space         | null  |
//!
//! Any other byte is kept as an invalid cell. Values are written as `T`,
//! `F` and `?`.

use std::io::{Read, Write};
use std::sync::Arc;

use super::{require_field, ValueCell};
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DbaseFieldType, LOGICAL_LENGTH};

const TRUE_BYTE: u8 = b'T';
const FALSE_BYTE: u8 = b'F';
const NULL_BYTE: u8 = b'?';

fn decode(byte: u8) -> ValueCell<bool> {
    match byte {
        b'y' | b'Y' | b't' | b'T' => ValueCell::Value(true),
        b'n' | b'N' | b'f' | b'F' => ValueCell::Value(false),
        b'?' | b' ' => ValueCell::Null,
        other => ValueCell::Invalid(format!("0x{other:02X} is not a logical value")),
    }
}

fn encode(field: &DbaseField, cell: &ValueCell<bool>) -> DbaseResult<u8> {
    match cell {
        ValueCell::Value(true) => Ok(TRUE_BYTE),
        ValueCell::Value(false) => Ok(FALSE_BYTE),
        ValueCell::Null => Ok(NULL_BYTE),
        ValueCell::Invalid(reason) => Err(DbaseError::format(field.name().as_str(), reason.clone())),
    }
}

fn read_cell<R: Read>(field: &DbaseField, reader: &mut R) -> DbaseResult<ValueCell<bool>> {
    let byte = io_utils::read_byte(reader, field.name().as_str())?;
    Ok(decode(byte))
}

fn bind(field: &DbaseField, variant: &'static str) -> DbaseResult<()> {
    require_field(field, variant, &[DbaseFieldType::Logical], Some(LOGICAL_LENGTH))
}

/// Nullable logical.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseLogical {
    field: Arc<DbaseField>,
    cell: ValueCell<bool>,
}

impl DbaseLogical {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        bind(&field, "logical")?;
        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: bool) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(Some(value));
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> DbaseResult<Option<bool>> {
        self.cell.get(&self.field)
    }

    pub fn set_value(&mut self, value: Option<bool>) {
        self.cell = value.into();
    }

    /// Every logical value fits the one-byte field.
    pub fn accepts_value(&self, _value: Option<bool>) -> bool {
        true
    }

    pub fn has_value(&self) -> bool {
        !self.cell.is_null()
    }

    pub fn reset(&mut self) {
        self.cell = ValueCell::Null;
    }

    pub fn read<R: Read>(&mut self, reader: &mut R) -> DbaseResult<()> {
        self.cell = read_cell(&self.field, reader)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        io_utils::write_all(writer, &[encode(&self.field, &self.cell)?])
    }
}

/// Non-nullable logical: reading a null byte succeeds, but `value` then
/// fails with `Format`.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseBoolean {
    field: Arc<DbaseField>,
    cell: ValueCell<bool>,
}

impl DbaseBoolean {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        bind(&field, "boolean")?;
        Ok(Self {
            field,
            cell: ValueCell::Null,
        })
    }

    pub fn with_value(field: Arc<DbaseField>, value: bool) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(value);
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> DbaseResult<bool> {
        self.cell
            .get(&self.field)?
            .ok_or_else(|| DbaseError::format(self.field.name().as_str(), "value is null"))
    }

    pub fn set_value(&mut self, value: bool) {
        self.cell = ValueCell::Value(value);
    }

    pub fn accepts_value(&self, _value: bool) -> bool {
        true
    }

    pub fn has_value(&self) -> bool {
        !self.cell.is_null()
    }

    pub fn reset(&mut self) {
        self.cell = ValueCell::Null;
    }

    pub fn read<R: Read>(&mut self, reader: &mut R) -> DbaseResult<()> {
        self.cell = read_cell(&self.field, reader)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        io_utils::write_all(writer, &[encode(&self.field, &self.cell)?])
    }
}
