//! dBase III header codec
//!
//! The header is read and validated in full before any record: a wrong
//! marker, unsupported code page, inconsistent offset or length halts the
//! read. No repair is attempted.

mod code_page;
mod descriptor;
mod file_header;

pub use code_page::DbaseCodePage;
pub use descriptor::{decode_descriptor, encode_descriptor, DESCRIPTOR_SIZE};
pub use file_header::{
    DbaseFileHeader, END_OF_FILE, FIELD_TERMINATOR, FIXED_HEADER_SIZE, HEADER_MARKER,
};
