//! Ordered, offset-consistent list of fields describing a record layout.

use std::sync::Arc;

use super::field::DbaseField;
use crate::errors::{DbaseError, DbaseResult};
use crate::primitives::{ByteLength, ByteOffset};
use crate::values::DbaseFieldValue;

/// Length of the deleted-flag byte that leads every record.
pub const DELETED_FLAG_LENGTH: i32 = 1;

/// Record layout: at most 128 fields, laid out contiguously from offset 0.
///
/// Fields are shared with the values bound to them and never change after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbaseSchema {
    fields: Vec<Arc<DbaseField>>,
    length: ByteLength,
}

impl DbaseSchema {
    pub const MAX_FIELD_COUNT: usize = 128;

    /// Creates a schema from fields whose offsets are already laid out.
    ///
    /// The first field must start at offset 0 and every following field
    /// must start where the previous one ends. Offsets are never renumbered.
    pub fn new(fields: Vec<DbaseField>) -> DbaseResult<Self> {
        Self::check_count(fields.len())?;

        let mut expected = ByteOffset::INITIAL;
        for field in &fields {
            if field.offset() != expected {
                return Err(DbaseError::OffsetMismatch {
                    field: field.name().to_string(),
                    declared: field.offset().to_i32(),
                    expected: expected.to_i32(),
                });
            }
            expected = field.end_offset()?;
        }

        Self::from_checked(fields)
    }

    /// Creates a schema, recomputing every offset from scratch.
    pub fn with_computed_offsets(fields: Vec<DbaseField>) -> DbaseResult<Self> {
        Self::check_count(fields.len())?;

        let mut positioned: Vec<DbaseField> = Vec::with_capacity(fields.len());
        for field in fields {
            let next = match positioned.last() {
                Some(previous) => field.after(previous)?,
                None => field.at(ByteOffset::INITIAL),
            };
            positioned.push(next);
        }

        Self::from_checked(positioned)
    }

    fn check_count(count: usize) -> DbaseResult<()> {
        if count > Self::MAX_FIELD_COUNT {
            return Err(DbaseError::TooManyFields {
                count,
                max: Self::MAX_FIELD_COUNT,
            });
        }
        Ok(())
    }

    fn from_checked(fields: Vec<DbaseField>) -> DbaseResult<Self> {
        let mut length = ByteLength::new(DELETED_FLAG_LENGTH)?;
        for field in &fields {
            length = length.plus(field.length().to_byte_length())?;
        }

        Ok(Self {
            fields: fields.into_iter().map(Arc::new).collect(),
            length,
        })
    }

    pub fn fields(&self) -> &[Arc<DbaseField>] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Record byte length: sum of field lengths plus the deleted flag.
    pub fn length(&self) -> ByteLength {
        self.length
    }

    /// Looks up a field by name, ignoring ASCII case.
    pub fn field_by_name(&self, name: &str) -> Option<&Arc<DbaseField>> {
        self.fields.iter().find(|f| f.name().matches(name))
    }

    /// Builds one default value per field, in schema order.
    pub fn create_values(&self) -> DbaseResult<Vec<DbaseFieldValue>> {
        self.fields
            .iter()
            .map(|field| DbaseFieldValue::for_field(Arc::clone(field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;

    fn sample_fields() -> Vec<DbaseField> {
        vec![
            DbaseField::create_character_field("NAME", 20).unwrap(),
            DbaseField::create_number_field("AGE", 3, 0).unwrap(),
            DbaseField::create_date_field("BORN").unwrap(),
            DbaseField::create_logical_field("ACTIVE").unwrap(),
        ]
    }

    #[test]
    fn test_computed_offsets_are_contiguous() {
        let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
        let fields = schema.fields();
        assert_eq!(fields[0].offset().to_i32(), 0);
        for pair in fields.windows(2) {
            assert_eq!(
                pair[1].offset().to_i32(),
                pair[0].offset().to_i32() + i32::from(pair[0].length().to_u8())
            );
        }
    }

    #[test]
    fn test_length_includes_deleted_flag() {
        let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
        assert_eq!(schema.length().to_i32(), 20 + 3 + 8 + 1 + 1);
    }

    #[test]
    fn test_inconsistent_offsets_rejected() {
        // every field still sits at offset 0
        let err = DbaseSchema::new(sample_fields()).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::OffsetMismatch);
        assert!(err.to_string().contains("AGE"));
    }

    #[test]
    fn test_first_field_must_start_at_zero() {
        let field = DbaseField::create_character_field("NAME", 5)
            .unwrap()
            .at(ByteOffset::new(1).unwrap());
        let err = DbaseSchema::new(vec![field]).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::OffsetMismatch);
    }

    #[test]
    fn test_laid_out_fields_accepted() {
        let laid_out = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
        let fields: Vec<DbaseField> = laid_out.fields().iter().map(|f| (**f).clone()).collect();
        let schema = DbaseSchema::new(fields).unwrap();
        assert_eq!(schema, laid_out);
    }

    #[test]
    fn test_field_count_limit() {
        let fields: Vec<DbaseField> = (0..129)
            .map(|i| DbaseField::create_character_field(&format!("F{i}"), 1).unwrap())
            .collect();
        let err = DbaseSchema::with_computed_offsets(fields).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::TooManyFields);

        let fields: Vec<DbaseField> = (0..128)
            .map(|i| DbaseField::create_character_field(&format!("F{i}"), 1).unwrap())
            .collect();
        assert_eq!(
            DbaseSchema::with_computed_offsets(fields).unwrap().field_count(),
            128
        );
    }

    #[test]
    fn test_empty_schema_is_just_the_deleted_flag() {
        let schema = DbaseSchema::new(Vec::new()).unwrap();
        assert_eq!(schema.field_count(), 0);
        assert_eq!(schema.length().to_i32(), DELETED_FLAG_LENGTH);
        assert!(schema.create_values().unwrap().is_empty());
        assert_eq!(
            DbaseSchema::with_computed_offsets(Vec::new()).unwrap(),
            schema
        );
    }

    #[test]
    fn test_field_lookup_ignores_case() {
        let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
        assert_eq!(schema.field_by_name("age").unwrap().name().as_str(), "AGE");
        assert!(schema.field_by_name("missing").is_none());
    }

    #[test]
    fn test_create_values_follow_schema_order() {
        let schema = DbaseSchema::with_computed_offsets(sample_fields()).unwrap();
        let values = schema.create_values().unwrap();
        assert_eq!(values.len(), 4);
        for (value, field) in values.iter().zip(schema.fields()) {
            assert_eq!(value.field(), field.as_ref());
            assert!(!value.has_value());
        }
    }
}
