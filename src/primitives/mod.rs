//! Small bounded scalar types used throughout the codec.
//!
//! Each type is an immutable integer with a non-negative (or positive)
//! invariant checked at construction. Arithmetic is checked and fails
//! instead of wrapping.

mod bytes;
mod field_sizes;
mod records;
mod words;

pub use bytes::{ByteLength, ByteOffset};
pub use field_sizes::{DbaseDecimalCount, DbaseFieldLength, DbaseIntegerDigits};
pub use records::{RecordCount, RecordNumber};
pub use words::{WordLength, WordOffset};
