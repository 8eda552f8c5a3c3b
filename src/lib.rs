//! dbase-codec - Reader and writer for dBase III `.dbf` tables
//!
//! The crate decodes and encodes the fixed-layout header, the field
//! descriptors and the fixed-width records of a dBase III file. Every
//! field value is bound to its field and checked against that field's
//! type and capacity before it can be written.
//!
//! # Layout
//!
//! - `primitives`: bounded scalar types (lengths, offsets, record counts)
//! - `schema`: field names, types, descriptors and record layout
//! - `values`: typed cells for each field kind
//! - `header`: file header and code pages
//! - `record`: record codec, enumerator and writer
//! - `config`: JSON-loadable reader/writer settings

pub mod config;
pub mod errors;
pub mod header;
mod io_utils;
pub mod primitives;
pub mod record;
pub mod schema;
pub mod values;

pub use config::DbaseConfig;
pub use errors::{DbaseError, DbaseErrorCode, DbaseResult, Severity};
pub use header::{DbaseCodePage, DbaseFileHeader};
pub use record::{DbaseRecord, DbaseRecordEnumerator, DbaseRecordIterator, DbaseRecordWriter};
pub use schema::{DbaseField, DbaseFieldName, DbaseFieldType, DbaseSchema};
pub use values::DbaseFieldValue;
