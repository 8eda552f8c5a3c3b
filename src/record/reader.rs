//! Forward-only record enumerator
//!
//! - Records are read strictly in order, one pass only
//! - Reading stops after the declared record count or at the end-of-file
//!   marker, whichever comes first
//! - Any structural error halts the enumeration; the stream position is
//!   undefined afterwards

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, trace};

use super::row::DbaseRecord;
use crate::config::DbaseConfig;
use crate::errors::{DbaseError, DbaseResult};
use crate::header::{DbaseFileHeader, END_OF_FILE};
use crate::io_utils;
use crate::primitives::RecordNumber;

/// Sequential reader over the records that follow a header.
///
/// `current` is valid only between a `move_next` that returned `true` and
/// the next call to `move_next`.
pub struct DbaseRecordEnumerator<R: Read> {
    header: DbaseFileHeader,
    /// `None` once closed
    reader: Option<R>,
    encoding: &'static Encoding,
    /// Reused for every record
    record: DbaseRecord,
    records_read: u32,
    current_record_number: RecordNumber,
    has_current: bool,
    exhausted: bool,
}

impl<R: Read> DbaseRecordEnumerator<R> {
    /// Creates an enumerator over `reader`, positioned just after `header`.
    pub fn new(header: DbaseFileHeader, reader: R, encoding: &'static Encoding) -> DbaseResult<Self> {
        let record = header.create_record()?;
        Ok(Self {
            header,
            reader: Some(reader),
            encoding,
            record,
            records_read: 0,
            current_record_number: RecordNumber::initial(),
            has_current: false,
            exhausted: false,
        })
    }

    /// Reads the header from `reader` and enumerates the records after it.
    pub fn from_reader(mut reader: R, config: &DbaseConfig) -> DbaseResult<Self> {
        let fallback = config.fallback_encoding()?;
        let header = DbaseFileHeader::read(&mut reader)?;
        let encoding = header.encoding(fallback);
        Self::new(header, reader, encoding)
    }

    pub fn header(&self) -> &DbaseFileHeader {
        &self.header
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn records_read(&self) -> u32 {
        self.records_read
    }

    /// Number of the current record, starting at 1.
    pub fn current_record_number(&self) -> RecordNumber {
        self.current_record_number
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Advances to the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a record was read and is available from `current`
    /// - `Ok(false)` once the declared count is reached or the end-of-file
    ///   marker is read
    ///
    /// # Errors
    ///
    /// - `DBF_INVALID_STATE` if the enumerator is closed
    /// - `DBF_END_OF_STREAM` if the stream ends before the declared count
    /// - `DBF_INVALID_RECORD` for an unknown deleted flag
    pub fn move_next(&mut self) -> DbaseResult<bool> {
        if self.is_closed() {
            return Err(DbaseError::invalid_state("enumerator is closed"));
        }
        self.has_current = false;
        if self.exhausted {
            return Ok(false);
        }
        if self.records_read >= self.header.record_count().to_u32() {
            self.finish("record count reached");
            return Ok(false);
        }

        let Some(reader) = self.reader.as_mut() else {
            return Err(DbaseError::invalid_state("enumerator is closed"));
        };
        let flag = io_utils::read_optional_byte(reader)?.ok_or_else(|| {
            DbaseError::end_of_stream(format!(
                "expected {} records, stream ended after {}",
                self.header.record_count(),
                self.records_read
            ))
        })?;
        if flag == END_OF_FILE {
            self.finish("end of file marker");
            return Ok(false);
        }

        self.record.read_body(flag, reader, self.encoding)?;

        if self.records_read > 0 {
            self.current_record_number = self.current_record_number.next()?;
        }
        self.records_read += 1;
        self.has_current = true;

        trace!(
            event = "DBF_RECORD_READ",
            record_number = self.current_record_number.to_i32(),
            deleted = self.record.is_deleted(),
        );
        Ok(true)
    }

    fn finish(&mut self, reason: &'static str) {
        if !self.exhausted {
            self.exhausted = true;
            debug!(
                event = "DBF_END_OF_RECORDS",
                records_read = self.records_read,
                record_count = self.header.record_count().to_u32(),
                reason,
                "enumeration finished"
            );
        }
    }

    /// The record read by the last successful `move_next`.
    pub fn current(&self) -> DbaseResult<&DbaseRecord> {
        if !self.has_current {
            return Err(DbaseError::invalid_state(
                "no current record; call move_next first",
            ));
        }
        Ok(&self.record)
    }

    /// Always fails: the source is not assumed to be seekable.
    pub fn reset(&mut self) -> DbaseResult<()> {
        Err(DbaseError::NotSupported(
            "record enumerator cannot be reset".into(),
        ))
    }

    /// Releases the underlying reader. Later calls to `move_next` fail.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            self.has_current = false;
            debug!(
                event = "DBF_ENUMERATOR_CLOSED",
                records_read = self.records_read,
                "enumerator closed"
            );
        }
    }
}

impl DbaseRecordEnumerator<BufReader<File>> {
    /// Opens a `.dbf` file and reads its header.
    pub fn open(path: &Path, config: &DbaseConfig) -> DbaseResult<Self> {
        config.validate()?;
        let file = File::open(path)?;
        Self::from_reader(BufReader::with_capacity(config.buffer_capacity, file), config)
    }
}

/// Iterator over owned records.
///
/// Stops at the first error, which is then available from `error`.
pub struct DbaseRecordIterator<R: Read> {
    enumerator: DbaseRecordEnumerator<R>,
    error: Option<DbaseError>,
}

impl<R: Read> DbaseRecordIterator<R> {
    pub fn new(enumerator: DbaseRecordEnumerator<R>) -> Self {
        Self {
            enumerator,
            error: None,
        }
    }

    /// Returns the error if iteration failed.
    pub fn error(&self) -> Option<&DbaseError> {
        self.error.as_ref()
    }

    /// Consumes the iterator and returns the error if any.
    pub fn into_error(self) -> Option<DbaseError> {
        self.error
    }
}

impl<R: Read> Iterator for DbaseRecordIterator<R> {
    type Item = DbaseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }

        match self.enumerator.move_next() {
            Ok(true) => self.enumerator.current().ok().cloned(),
            Ok(false) => None,
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

impl<R: Read> IntoIterator for DbaseRecordEnumerator<R> {
    type Item = DbaseRecord;
    type IntoIter = DbaseRecordIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        DbaseRecordIterator::new(self)
    }
}
