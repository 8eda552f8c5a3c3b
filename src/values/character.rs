use std::io::{Read, Write};
use std::sync::Arc;

use encoding_rs::Encoding;

use super::require_field;
use crate::errors::{DbaseError, DbaseResult};
use crate::io_utils;
use crate::schema::{DbaseField, DbaseFieldType};

/// Space-padded text of a Character field.
///
/// Null and the empty string are distinct in memory but share the all-space
/// encoding, so a null written to a file reads back as empty text.
#[derive(Debug, Clone, PartialEq)]
pub struct DbaseCharacter {
    field: Arc<DbaseField>,
    value: Option<String>,
}

impl DbaseCharacter {
    pub fn new(field: Arc<DbaseField>) -> DbaseResult<Self> {
        require_field(&field, "character", &[DbaseFieldType::Character], None)?;
        Ok(Self { field, value: None })
    }

    pub fn with_value(field: Arc<DbaseField>, value: impl Into<String>) -> DbaseResult<Self> {
        let mut this = Self::new(field)?;
        this.set_value(Some(value.into()))?;
        Ok(this)
    }

    pub fn field(&self) -> &DbaseField {
        &self.field
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Assigns text, failing with `Range` when it has more characters than
    /// the field is long. Bytes are checked again on write, once the code
    /// page is known.
    pub fn set_value(&mut self, value: Option<String>) -> DbaseResult<()> {
        if let Some(text) = &value {
            self.check_length(text)?;
        }
        self.value = value;
        Ok(())
    }

    pub fn accepts_value(&self, value: Option<&str>) -> bool {
        value.map_or(true, |text| self.check_length(text).is_ok())
    }

    fn check_length(&self, text: &str) -> DbaseResult<()> {
        let count = text.chars().count();
        if count > self.field.length().to_usize() {
            return Err(DbaseError::range(
                self.field.name().as_str(),
                format!(
                    "{count} characters do not fit a field of length {}",
                    self.field.length()
                ),
            ));
        }
        Ok(())
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Reads and decodes the field's bytes; trailing padding is dropped.
    pub fn read<R: Read>(&mut self, reader: &mut R, encoding: &'static Encoding) -> DbaseResult<()> {
        let bytes = io_utils::read_vec(
            reader,
            self.field.length().to_usize(),
            self.field.name().as_str(),
        )?;
        let (text, _) = encoding.decode_without_bom_handling(&bytes);
        self.value = Some(text.trim_end_matches([' ', '\0']).to_string());
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W, encoding: &'static Encoding) -> DbaseResult<()> {
        let width = self.field.length().to_usize();
        let mut bytes = match &self.value {
            Some(text) => {
                let (encoded, _, had_errors) = encoding.encode(text);
                if had_errors {
                    return Err(DbaseError::format(
                        self.field.name().as_str(),
                        format!("{text:?} cannot be encoded as {}", encoding.name()),
                    ));
                }
                encoded.into_owned()
            }
            None => Vec::with_capacity(width),
        };

        if bytes.len() > width {
            return Err(DbaseError::range(
                self.field.name().as_str(),
                format!("{} encoded bytes exceed field length {width}", bytes.len()),
            ));
        }
        bytes.resize(width, b' ');
        io_utils::write_all(writer, &bytes)
    }
}
