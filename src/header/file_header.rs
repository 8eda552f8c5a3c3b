//! dBase III file header.
//!
//! ```text
//! [0]       marker 0x03
//! [1..4)    last updated: year - 1900, month, day
//! [4..8)    record count, u32 LE
//! [8..10)   header length, i16 LE = 32 + 32 * field count + 1
//! [10..12)  record length, i16 LE = schema length
//! [12..29)  reserved
//! [29]      code page
//! [30..32)  reserved
//! [32..)    field descriptors, 32 bytes each, then 0x0D
//! ```

use std::io::{Read, Write};

use chrono::{Datelike, NaiveDate};
use encoding_rs::Encoding;
use tracing::debug;

use super::code_page::DbaseCodePage;
use super::descriptor::{decode_descriptor, encode_descriptor, DESCRIPTOR_SIZE};
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::primitives::{ByteLength, RecordCount};
use crate::record::DbaseRecord;
use crate::schema::DbaseSchema;

pub const HEADER_MARKER: u8 = 0x03;
pub const FIELD_TERMINATOR: u8 = 0x0D;
pub const END_OF_FILE: u8 = 0x1A;

/// Size of the header before the field descriptors.
pub const FIXED_HEADER_SIZE: usize = 32;

const BASE_YEAR: i32 = 1900;
/// Last year the one-byte year offset can hold.
const MAX_YEAR: i32 = BASE_YEAR + 255;

const RECORD_COUNT_RANGE: std::ops::Range<usize> = 4..8;
const HEADER_LENGTH_RANGE: std::ops::Range<usize> = 8..10;
const RECORD_LENGTH_RANGE: std::ops::Range<usize> = 10..12;
const CODE_PAGE_OFFSET: usize = 29;

/// File-level metadata preceding all records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbaseFileHeader {
    last_updated: NaiveDate,
    code_page: DbaseCodePage,
    record_count: RecordCount,
    schema: DbaseSchema,
}

impl DbaseFileHeader {
    /// Creates a header. The last-updated year must be 1900..=2155.
    pub fn new(
        last_updated: NaiveDate,
        code_page: DbaseCodePage,
        record_count: RecordCount,
        schema: DbaseSchema,
    ) -> DbaseResult<Self> {
        let year = last_updated.year();
        if !(BASE_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DbaseError::range(
                "last updated",
                format!("year {year} is outside {BASE_YEAR}..={MAX_YEAR}"),
            ));
        }

        Ok(Self {
            last_updated,
            code_page,
            record_count,
            schema,
        })
    }

    pub fn last_updated(&self) -> NaiveDate {
        self.last_updated
    }

    pub fn code_page(&self) -> DbaseCodePage {
        self.code_page
    }

    pub fn record_count(&self) -> RecordCount {
        self.record_count
    }

    pub fn schema(&self) -> &DbaseSchema {
        &self.schema
    }

    /// Byte length of the header: fixed part, descriptors and terminator.
    pub fn header_length(&self) -> ByteLength {
        Self::header_length_for(self.schema.field_count())
    }

    fn header_length_for(field_count: usize) -> ByteLength {
        // at most 128 fields, always within i32
        let len = FIXED_HEADER_SIZE + DESCRIPTOR_SIZE * field_count + 1;
        ByteLength::new(i32::try_from(len).unwrap_or(i32::MAX)).unwrap_or(ByteLength::ZERO)
    }

    /// Byte length of every record, deleted flag included.
    pub fn record_length(&self) -> ByteLength {
        self.schema.length()
    }

    /// Returns a copy declaring `record_count` records.
    pub fn with_record_count(&self, record_count: RecordCount) -> Self {
        Self {
            record_count,
            ..self.clone()
        }
    }

    /// Text encoding for character values.
    pub fn encoding(&self, fallback: &'static Encoding) -> &'static Encoding {
        self.code_page.encoding_or(fallback)
    }

    /// Builds an empty record laid out like the schema.
    pub fn create_record(&self) -> DbaseResult<DbaseRecord> {
        DbaseRecord::new(&self.schema)
    }

    /// Reads and validates a header.
    ///
    /// The marker is checked before anything else is read, and the code
    /// page before any field descriptor.
    ///
    /// # Errors
    ///
    /// - `DBF_INVALID_HEADER` for a wrong marker, date, descriptor, offset,
    ///   header length or record length
    /// - `DBF_UNSUPPORTED_CODE_PAGE` for a code page outside the table
    /// - `DBF_END_OF_STREAM` if the stream ends inside the header
    pub fn read<R: Read>(reader: &mut R) -> DbaseResult<Self> {
        let mut fixed = [0u8; FIXED_HEADER_SIZE];
        fixed[0] = io_utils::read_byte(reader, "header marker")?;
        if fixed[0] != HEADER_MARKER {
            return Err(DbaseError::invalid_header(format!(
                "expected marker 0x{HEADER_MARKER:02X}, found 0x{:02X}",
                fixed[0]
            )));
        }
        io_utils::read_exact_or_eos(reader, &mut fixed[1..], "header")?;

        let code_page = DbaseCodePage::new(fixed[CODE_PAGE_OFFSET])?;

        let last_updated = NaiveDate::from_ymd_opt(
            BASE_YEAR + i32::from(fixed[1]),
            u32::from(fixed[2]),
            u32::from(fixed[3]),
        )
        .ok_or_else(|| {
            DbaseError::invalid_header(format!(
                "invalid last updated date {:?}",
                &fixed[1..4]
            ))
        })?;

        let record_count =
            RecordCount::new(u32::from_le_bytes(le_array(&fixed[RECORD_COUNT_RANGE])));
        let declared_header_length =
            i16::from_le_bytes(le_array(&fixed[HEADER_LENGTH_RANGE]));
        let declared_record_length =
            i16::from_le_bytes(le_array(&fixed[RECORD_LENGTH_RANGE]));

        let mut fields = Vec::new();
        loop {
            let mut descriptor = [0u8; DESCRIPTOR_SIZE];
            descriptor[0] = io_utils::read_byte(reader, "field descriptor")?;
            if descriptor[0] == FIELD_TERMINATOR {
                break;
            }
            if fields.len() == DbaseSchema::MAX_FIELD_COUNT {
                return Err(DbaseError::invalid_header(format!(
                    "no terminator after {} field descriptors",
                    DbaseSchema::MAX_FIELD_COUNT
                )));
            }
            io_utils::read_exact_or_eos(reader, &mut descriptor[1..], "field descriptor")?;
            fields.push(decode_descriptor(&descriptor)?);
        }

        let field_count = fields.len();
        let schema =
            DbaseSchema::new(fields).map_err(|e| DbaseError::invalid_header(e.to_string()))?;

        let expected_header_length = Self::header_length_for(field_count);
        if i32::from(declared_header_length) != expected_header_length.to_i32() {
            return Err(DbaseError::invalid_header(format!(
                "header length {declared_header_length} does not match {field_count} fields (expected {expected_header_length})"
            )));
        }
        if i32::from(declared_record_length) != schema.length().to_i32() {
            return Err(DbaseError::invalid_header(format!(
                "record length {declared_record_length} does not match schema length {}",
                schema.length()
            )));
        }

        debug!(
            event = "DBF_HEADER_READ",
            record_count = record_count.to_u32(),
            field_count,
            code_page = code_page.to_byte(),
            "header read"
        );

        Self::new(last_updated, code_page, record_count, schema)
            .map_err(|e| DbaseError::invalid_header(e.to_string()))
    }

    /// Writes the header, its field descriptors and the terminator.
    pub fn write<W: Write>(&self, writer: &mut W) -> DbaseResult<()> {
        let mut fixed = [0u8; FIXED_HEADER_SIZE];
        fixed[0] = HEADER_MARKER;
        // the year range is checked at construction
        fixed[1] = u8::try_from(self.last_updated.year() - BASE_YEAR).unwrap_or(0);
        fixed[2] = self.last_updated.month() as u8;
        fixed[3] = self.last_updated.day() as u8;
        let header_length = to_i16(self.header_length(), "header length")?;
        let record_length = to_i16(self.record_length(), "record length")?;
        fixed[RECORD_COUNT_RANGE].copy_from_slice(&self.record_count.to_u32().to_le_bytes());
        fixed[HEADER_LENGTH_RANGE].copy_from_slice(&header_length.to_le_bytes());
        fixed[RECORD_LENGTH_RANGE].copy_from_slice(&record_length.to_le_bytes());
        fixed[CODE_PAGE_OFFSET] = self.code_page.to_byte();

        io_utils::write_all(writer, &fixed)?;
        for field in self.schema.fields() {
            io_utils::write_all(writer, &encode_descriptor(field))?;
        }
        io_utils::write_all(writer, &[FIELD_TERMINATOR])?;

        debug!(
            event = "DBF_HEADER_WRITTEN",
            record_count = self.record_count.to_u32(),
            field_count = self.schema.field_count(),
            code_page = self.code_page.to_byte(),
            "header written"
        );
        Ok(())
    }
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn to_i16(length: ByteLength, what: &str) -> DbaseResult<i16> {
    i16::try_from(length.to_i32())
        .map_err(|_| DbaseError::invalid_header(format!("{what} {length} exceeds i16")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;
    use crate::schema::DbaseField;
    use std::io::Cursor;

    fn schema() -> DbaseSchema {
        DbaseSchema::with_computed_offsets(vec![
            DbaseField::create_character_field("NAME", 10).unwrap(),
            DbaseField::create_number_field("QTY", 5, 0).unwrap(),
        ])
        .unwrap()
    }

    fn header() -> DbaseFileHeader {
        DbaseFileHeader::new(
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            DbaseCodePage::WESTERN_EUROPEAN_ANSI,
            RecordCount::new(3),
            schema(),
        )
        .unwrap()
    }

    fn header_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        header().write(&mut out).unwrap();
        out
    }

    #[test]
    fn test_layout() {
        let bytes = header_bytes();
        assert_eq!(bytes.len(), 32 + 2 * 32 + 1);
        assert_eq!(bytes[0], 0x03);
        assert_eq!(&bytes[1..4], &[124, 5, 17]);
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[8..10], &97i16.to_le_bytes());
        assert_eq!(&bytes[10..12], &16i16.to_le_bytes());
        assert_eq!(bytes[29], 0x57);
        assert_eq!(*bytes.last().unwrap(), 0x0D);
    }

    #[test]
    fn test_round_trip() {
        let read = DbaseFileHeader::read(&mut Cursor::new(header_bytes())).unwrap();
        assert_eq!(read, header());
        assert_eq!(read.header_length().to_i32(), 97);
        assert_eq!(read.record_length().to_i32(), 16);
    }

    #[test]
    fn test_wrong_marker_fails_before_descriptors() {
        let mut bytes = header_bytes();
        bytes[0] = 0x00;
        // everything after the marker is garbage
        bytes.truncate(1);
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
    }

    #[test]
    fn test_unsupported_code_page() {
        let mut bytes = header_bytes();
        bytes[29] = 0x05;
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::UnsupportedCodePage);
    }

    #[test]
    fn test_header_length_mismatch() {
        let mut bytes = header_bytes();
        bytes[8..10].copy_from_slice(&65i16.to_le_bytes());
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
        assert!(err.to_string().contains("header length"));
    }

    #[test]
    fn test_record_length_mismatch() {
        let mut bytes = header_bytes();
        bytes[10..12].copy_from_slice(&15i16.to_le_bytes());
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("record length"));
    }

    #[test]
    fn test_offset_mismatch() {
        let mut bytes = header_bytes();
        // second descriptor's offset field
        bytes[32 + 32 + 12..32 + 32 + 16].copy_from_slice(&11u32.to_le_bytes());
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::InvalidHeader);
        assert!(err.to_string().contains("QTY"));
    }

    #[test]
    fn test_missing_terminator() {
        let mut bytes = header_bytes();
        bytes.pop();
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::EndOfStream);
    }

    #[test]
    fn test_too_many_descriptors() {
        let mut bytes = header_bytes();
        bytes.truncate(FIXED_HEADER_SIZE);
        let field = DbaseField::create_character_field("F", 1).unwrap();
        for _ in 0..=DbaseSchema::MAX_FIELD_COUNT {
            bytes.extend_from_slice(&encode_descriptor(&field));
        }
        bytes.push(FIELD_TERMINATOR);
        let err = DbaseFileHeader::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("terminator"));
    }

    #[test]
    fn test_year_range() {
        let too_late = NaiveDate::from_ymd_opt(2156, 1, 1).unwrap();
        let err = DbaseFileHeader::new(
            too_late,
            DbaseCodePage::default(),
            RecordCount::ZERO,
            schema(),
        )
        .unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::Range);
    }

    #[test]
    fn test_with_record_count() {
        let updated = header().with_record_count(RecordCount::new(42));
        assert_eq!(updated.record_count().to_u32(), 42);
        assert_eq!(updated.schema(), header().schema());
    }

    #[test]
    fn test_create_record_matches_schema() {
        let record = header().create_record().unwrap();
        assert_eq!(record.values().len(), 2);
        assert!(!record.is_deleted());
    }

    #[test]
    fn test_zero_field_header_round_trip() {
        let empty = DbaseFileHeader::new(
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            DbaseCodePage::WESTERN_EUROPEAN_ANSI,
            RecordCount::new(0),
            DbaseSchema::new(Vec::new()).unwrap(),
        )
        .unwrap();

        let mut out = Vec::new();
        empty.write(&mut out).unwrap();
        assert_eq!(out.len(), FIXED_HEADER_SIZE + 1);
        assert_eq!(u16::from_le_bytes([out[8], out[9]]), 33);
        assert_eq!(u16::from_le_bytes([out[10], out[11]]), 1);
        assert_eq!(out[FIXED_HEADER_SIZE], FIELD_TERMINATOR);

        let decoded = DbaseFileHeader::read(&mut Cursor::new(out)).unwrap();
        assert_eq!(decoded, empty);
        assert_eq!(decoded.record_length().to_i32(), 1);
    }
}
