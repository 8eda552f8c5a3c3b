//! 32-byte field descriptor.
//!
//! ```text
//! [0..11)  name, NUL padded
//! [11]     type tag
//! [12..16) offset within the record, u32 LE
//! [16]     length
//! [17]     decimal count
//! [18..32) reserved
//! ```

use crate::errors::{DbaseError, DbaseResult};
use crate::primitives::{ByteOffset, DbaseDecimalCount, DbaseFieldLength};
use crate::schema::{DbaseField, DbaseFieldName, DbaseFieldType};

pub const DESCRIPTOR_SIZE: usize = 32;

const TYPE_OFFSET: usize = 11;
const OFFSET_RANGE: std::ops::Range<usize> = 12..16;
const LENGTH_OFFSET: usize = 16;
const DECIMAL_OFFSET: usize = 17;

/// Serializes a field into its descriptor bytes.
pub fn encode_descriptor(field: &DbaseField) -> [u8; DESCRIPTOR_SIZE] {
    let mut buf = [0u8; DESCRIPTOR_SIZE];
    buf[..DbaseFieldName::SLOT_LENGTH].copy_from_slice(&field.name().to_slot());
    buf[TYPE_OFFSET] = field.field_type().to_byte();
    // offsets are non-negative by construction
    let offset = u32::try_from(field.offset().to_i32()).unwrap_or(0);
    buf[OFFSET_RANGE].copy_from_slice(&offset.to_le_bytes());
    buf[LENGTH_OFFSET] = field.length().to_u8();
    buf[DECIMAL_OFFSET] = field.decimal_count().to_u8();
    buf
}

/// Parses descriptor bytes. The first byte has already been checked not to
/// be the terminator.
pub fn decode_descriptor(buf: &[u8; DESCRIPTOR_SIZE]) -> DbaseResult<DbaseField> {
    let name = DbaseFieldName::from_slot(&buf[..DbaseFieldName::SLOT_LENGTH])
        .map_err(|e| DbaseError::invalid_header(e.to_string()))?;

    let tag = buf[TYPE_OFFSET];
    let field_type = DbaseFieldType::from_byte(tag).ok_or_else(|| {
        DbaseError::invalid_header(format!(
            "field '{name}' has unknown type tag 0x{tag:02X}"
        ))
    })?;

    let mut offset_bytes = [0u8; 4];
    offset_bytes.copy_from_slice(&buf[OFFSET_RANGE]);
    let raw_offset = u32::from_le_bytes(offset_bytes);
    let offset = i32::try_from(raw_offset)
        .map_err(|_| DbaseError::invalid_header(format!("field '{name}' offset {raw_offset} is too large")))
        .and_then(ByteOffset::new)?;

    let length = DbaseFieldLength::try_from(buf[LENGTH_OFFSET])
        .map_err(|e| DbaseError::invalid_header(format!("field '{name}': {e}")))?;
    let decimal_count = DbaseDecimalCount::try_from(buf[DECIMAL_OFFSET])
        .map_err(|e| DbaseError::invalid_header(format!("field '{name}': {e}")))?;

    DbaseField::new(name, field_type, offset, length, decimal_count)
        .map_err(|e| DbaseError::invalid_header(e.to_string()))
}
