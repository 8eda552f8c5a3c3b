//! Record codec and sequential file access
//!
//! A record is one deleted-flag byte followed by the fixed-width cells of
//! every field in schema order. Files are read and written strictly
//! forward.
//!
//! # Invariants Enforced
//!
//! - Record length always equals the schema's record length
//! - The header is written once, before the first record
//! - Enumeration halts on the first malformed record

mod reader;
mod row;
mod writer;

pub use reader::{DbaseRecordEnumerator, DbaseRecordIterator};
pub use row::{DbaseRecord, ALIVE_FLAG, DELETED_FLAG};
pub use writer::DbaseRecordWriter;
