//! Format Invariant Tests
//!
//! Tests for the structural rules of the dBase III layout:
//! - Field offsets are contiguous and start at 0
//! - Record length equals the flag byte plus every field length
//! - Header length equals 32 bytes per descriptor plus the fixed part
//! - Values never exceed their field's capacity
//! - Structural errors in a header halt the read

use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use dbase_codec::header::{DESCRIPTOR_SIZE, FIXED_HEADER_SIZE, HEADER_MARKER};
use dbase_codec::primitives::{ByteOffset, RecordCount};
use dbase_codec::values::{DbaseBoolean, DbaseCharacter, DbaseLogical, DbaseNumber};
use dbase_codec::{
    DbaseCodePage, DbaseErrorCode, DbaseField, DbaseFieldType, DbaseFileHeader, DbaseSchema,
};

// =============================================================================
// Test Utilities
// =============================================================================

fn sample_fields() -> Vec<DbaseField> {
    vec![
        DbaseField::create_character_field("NAME", 10).unwrap(),
        DbaseField::create_number_field("PRICE", 10, 4).unwrap(),
        DbaseField::create_date_field("SOLD").unwrap(),
        DbaseField::create_logical_field("ACTIVE").unwrap(),
    ]
}

fn sample_header(count: u32) -> DbaseFileHeader {
    DbaseFileHeader::new(
        NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
        DbaseCodePage::WINDOWS_ANSI,
        RecordCount::new(count),
        DbaseSchema::with_computed_offsets(sample_fields()).unwrap(),
    )
    .unwrap()
}

fn header_bytes(header: &DbaseFileHeader) -> Vec<u8> {
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    bytes
}

// =============================================================================
// Offsets and Lengths
// =============================================================================

#[test]
fn test_offsets_are_contiguous_from_zero() {
    let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
    let fields = schema.fields();

    assert_eq!(fields[0].offset(), ByteOffset::INITIAL);
    for pair in fields.windows(2) {
        assert_eq!(pair[1].offset(), pair[0].end_offset().unwrap());
    }
}

#[test]
fn test_record_length_is_flag_plus_field_lengths() {
    let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
    let sum: i32 = schema
        .fields()
        .iter()
        .map(|f| i32::from(f.length().to_u8()))
        .sum();
    assert_eq!(schema.length().to_i32(), 1 + sum);
    assert_eq!(schema.length().to_i32(), 1 + 10 + 10 + 8 + 1);
}

#[test]
fn test_header_length_counts_descriptors_and_terminator() {
    let header = sample_header(0);
    let bytes = header_bytes(&header);

    let expected = FIXED_HEADER_SIZE + 4 * DESCRIPTOR_SIZE + 1;
    assert_eq!(bytes.len(), expected);
    assert_eq!(header.header_length().to_usize(), expected);
    assert_eq!(usize::from(u16::from_le_bytes([bytes[8], bytes[9]])), expected);
    assert_eq!(i16::from_le_bytes([bytes[10], bytes[11]]), 30);
}

#[test]
fn test_misplaced_offset_rejected() {
    let name = DbaseField::create_character_field("NAME", 10).unwrap();
    let code = DbaseField::create_character_field("CODE", 2)
        .unwrap()
        .at(ByteOffset::new(5).unwrap());

    let err = DbaseSchema::new(vec![name.at(ByteOffset::INITIAL), code]).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::OffsetMismatch);
}

#[test]
fn test_field_count_limit() {
    let fields: Vec<DbaseField> = (0..129)
        .map(|i| DbaseField::create_logical_field(&format!("F{i}")).unwrap())
        .collect();
    let err = DbaseSchema::with_computed_offsets(fields).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::TooManyFields);
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn test_character_capacity_rejected() {
    let field = Arc::new(DbaseField::create_character_field("CODE", 3).unwrap());
    let err = DbaseCharacter::with_value(Arc::clone(&field), "ABCD").unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::Range);

    let mut value = DbaseCharacter::with_value(field, "ABC").unwrap();
    assert!(value.set_value(Some("WXYZ".into())).is_err());
    assert_eq!(value.value(), Some("ABC"));
}

#[test]
fn test_number_capacity_rejected() {
    // N(10,4) leaves 5 integer digits, 4 for negatives
    let field = Arc::new(DbaseField::create_number_field("PRICE", 10, 4).unwrap());
    let mut value = DbaseNumber::new(field).unwrap();

    assert!(value.set_value(Some(99_999.0)).is_ok());
    assert_eq!(
        value.set_value(Some(100_000.0)).unwrap_err().code(),
        DbaseErrorCode::Range
    );
    assert!(value.set_value(Some(-9_999.0)).is_ok());
    assert!(value.set_value(Some(-10_000.0)).is_err());
    assert_eq!(value.value().unwrap(), Some(-9_999.0));
}

#[test]
fn test_zero_with_decimals_is_right_justified() {
    let field = Arc::new(DbaseField::create_number_field("PRICE", 10, 4).unwrap());
    let value = DbaseNumber::with_value(field, 0.0).unwrap();

    let mut bytes = Vec::<u8>::new();
    value.write(&mut bytes).unwrap();
    assert_eq!(bytes, b"    0.0000");
}

// =============================================================================
// Logical Decoding
// =============================================================================

#[test]
fn test_logical_decode_table() {
    let field = Arc::new(DbaseField::create_logical_field("ACTIVE").unwrap());
    let mut logical = DbaseLogical::new(Arc::clone(&field)).unwrap();
    let mut boolean = DbaseBoolean::new(field).unwrap();

    for byte in *b"yYtT" {
        let mut src: &[u8] = &[byte];
        logical.read(&mut src).unwrap();
        assert_eq!(logical.value().unwrap(), Some(true), "byte {byte:#04x}");
        let mut src: &[u8] = &[byte];
        boolean.read(&mut src).unwrap();
        assert!(boolean.value().unwrap());
    }
    for byte in *b"nNfF" {
        let mut src: &[u8] = &[byte];
        logical.read(&mut src).unwrap();
        assert_eq!(logical.value().unwrap(), Some(false), "byte {byte:#04x}");
    }
    for byte in *b"? " {
        let mut src: &[u8] = &[byte];
        logical.read(&mut src).unwrap();
        assert_eq!(logical.value().unwrap(), None);
        let mut src: &[u8] = &[byte];
        boolean.read(&mut src).unwrap();
        assert_eq!(boolean.value().unwrap_err().code(), DbaseErrorCode::Format);
    }

    let mut src: &[u8] = b"x";
    logical.read(&mut src).unwrap();
    assert_eq!(logical.value().unwrap_err().code(), DbaseErrorCode::Format);
}

// =============================================================================
// Header Validation
// =============================================================================

#[test]
fn test_wrong_marker_rejected() {
    let mut bytes = header_bytes(&sample_header(0));
    assert_eq!(bytes[0], HEADER_MARKER);
    bytes[0] = 0x00;

    let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
}

#[test]
fn test_unknown_code_page_rejected() {
    let mut bytes = header_bytes(&sample_header(0));
    bytes[29] = 0xFF;

    let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::UnsupportedCodePage);
}

#[test]
fn test_declared_record_length_cross_checked() {
    let mut bytes = header_bytes(&sample_header(0));
    bytes[10] = bytes[10].wrapping_add(1);

    let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
}

#[test]
fn test_unknown_field_type_rejected() {
    let mut bytes = header_bytes(&sample_header(0));
    // type tag of the first descriptor
    bytes[FIXED_HEADER_SIZE + 11] = b'M';

    let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
}

#[test]
fn test_truncated_header_is_end_of_stream() {
    let bytes = header_bytes(&sample_header(0));
    let truncated = bytes[..FIXED_HEADER_SIZE + 10].to_vec();

    let err = DbaseFileHeader::read(&mut Cursor::new(truncated)).unwrap_err();
    assert_eq!(err.code(), DbaseErrorCode::EndOfStream);
}

#[test]
fn test_header_round_trip_keeps_schema() {
    let header = sample_header(7);
    let decoded = DbaseFileHeader::read(&mut Cursor::new(header_bytes(&header))).unwrap();

    assert_eq!(decoded, header);
    assert_eq!(decoded.record_count().to_u32(), 7);
    assert_eq!(
        decoded.schema().fields()[1].field_type(),
        DbaseFieldType::Number
    );
    assert!(decoded.schema().field_by_name("price").is_some());
}
