//! Sequential record writer
//!
//! The header is written when the writer is created. The caller writes
//! exactly `header.record_count` records and then the end-of-file marker;
//! the writer does not patch the header afterwards.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, trace, warn};

use super::row::DbaseRecord;
use crate::config::DbaseConfig;
use crate::errors::{DbaseError, DbaseResult};
use crate::header::{DbaseFileHeader, END_OF_FILE};
use crate::io_utils;

/// Writes a header followed by records to a sink.
pub struct DbaseRecordWriter<W: Write> {
    header: DbaseFileHeader,
    /// `None` once closed
    writer: Option<W>,
    encoding: &'static Encoding,
    records_written: u32,
    end_of_file_written: bool,
    write_end_of_file_on_close: bool,
}

impl<W: Write> DbaseRecordWriter<W> {
    /// Writes `header` to `writer` and returns a writer for its records.
    pub fn new(header: DbaseFileHeader, mut writer: W, encoding: &'static Encoding) -> DbaseResult<Self> {
        header.write(&mut writer)?;
        Ok(Self {
            header,
            writer: Some(writer),
            encoding,
            records_written: 0,
            end_of_file_written: false,
            write_end_of_file_on_close: false,
        })
    }

    /// Like `new`, taking the text encoding and close behavior from `config`.
    pub fn with_config(header: DbaseFileHeader, writer: W, config: &DbaseConfig) -> DbaseResult<Self> {
        let encoding = header.encoding(config.fallback_encoding()?);
        let mut this = Self::new(header, writer, encoding)?;
        this.write_end_of_file_on_close = config.write_end_of_file_marker_on_close;
        Ok(this)
    }

    pub fn header(&self) -> &DbaseFileHeader {
        &self.header
    }

    pub fn records_written(&self) -> u32 {
        self.records_written
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn sink(&mut self) -> DbaseResult<&mut W> {
        if self.end_of_file_written {
            return Err(DbaseError::invalid_state(
                "end of file marker already written",
            ));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| DbaseError::invalid_state("writer is closed"))
    }

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// - `DBF_INVALID_STATE` after `close` or `write_end_of_file`
    /// - `DBF_INVALID_SCHEMA` if the record is not laid out by the header's
    ///   schema, even when its length happens to match
    /// - `DBF_RANGE` / `DBF_FORMAT` if a value cannot be encoded; nothing is
    ///   written in that case
    pub fn write(&mut self, record: &DbaseRecord) -> DbaseResult<()> {
        let expected = self.header.record_length();
        if record.length() != expected {
            return Err(DbaseError::InvalidSchema(format!(
                "record length {} does not match header record length {expected}",
                record.length()
            )));
        }
        if !record.matches_schema(self.header.schema()) {
            return Err(DbaseError::InvalidSchema(
                "record fields do not match the header's schema".into(),
            ));
        }

        let encoding = self.encoding;
        let sink = self.sink()?;
        record.write(sink, encoding)?;
        self.records_written += 1;

        trace!(
            event = "DBF_RECORD_WRITTEN",
            records_written = self.records_written,
            deleted = record.is_deleted(),
        );
        Ok(())
    }

    /// Writes the `0x1A` marker that ends the file.
    pub fn write_end_of_file(&mut self) -> DbaseResult<()> {
        io_utils::write_all(self.sink()?, &[END_OF_FILE])?;
        self.end_of_file_written = true;

        let declared = self.header.record_count().to_u32();
        if self.records_written != declared {
            warn!(
                event = "DBF_RECORD_COUNT_MISMATCH",
                records_written = self.records_written,
                record_count = declared,
                "records written differ from the header record count"
            );
        }
        debug!(
            event = "DBF_END_OF_FILE",
            records_written = self.records_written,
            "end of file marker written"
        );
        Ok(())
    }

    pub fn flush(&mut self) -> DbaseResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush().map_err(DbaseError::Io),
            None => Err(DbaseError::invalid_state("writer is closed")),
        }
    }

    /// Flushes and releases the sink. Closing twice is a no-op.
    pub fn close(&mut self) -> DbaseResult<()> {
        if self.writer.is_none() {
            return Ok(());
        }
        if self.write_end_of_file_on_close && !self.end_of_file_written {
            self.write_end_of_file()?;
        }
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        debug!(
            event = "DBF_WRITER_CLOSED",
            records_written = self.records_written,
            "writer closed"
        );
        Ok(())
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> DbaseResult<W> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| DbaseError::invalid_state("writer is closed"))?;
        writer.flush()?;
        Ok(writer)
    }
}

impl DbaseRecordWriter<BufWriter<File>> {
    /// Creates (or truncates) a `.dbf` file and writes `header` to it.
    pub fn create(path: &Path, header: DbaseFileHeader, config: &DbaseConfig) -> DbaseResult<Self> {
        config.validate()?;
        let file = File::create(path)?;
        Self::with_config(
            header,
            BufWriter::with_capacity(config.buffer_capacity, file),
            config,
        )
    }
}
