//! Field and schema model for dBase III tables
//!
//! # Design Principles
//!
//! - Structural rules are enforced at construction, never lazily
//! - Offsets are validated, never silently renumbered
//! - Fields are immutable and shared read-only with their values

mod field;
mod field_name;
mod field_type;
mod record_schema;

pub use field::{
    DbaseField, DATE_LENGTH, DATE_TIME_LENGTH, FLOAT_MAX_LENGTH, LOGICAL_LENGTH,
    NUMBER_MAX_LENGTH,
};
pub use field_name::DbaseFieldName;
pub use field_type::DbaseFieldType;
pub use record_schema::{DbaseSchema, DELETED_FLAG_LENGTH};
