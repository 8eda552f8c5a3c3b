use std::fmt;

/// Column type tag as stored in the field descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbaseFieldType {
    /// `C`: space-padded text
    Character,
    /// `N`: fixed-point text number backed by a double
    Number,
    /// `F`: fixed-point text number backed by a single
    Float,
    /// `D`: `yyyyMMdd`
    Date,
    /// `L`: single-byte boolean
    Logical,
    /// `T`: 15-byte `yyyyMMddTHHmmss` timestamp
    DateTime,
}

impl DbaseFieldType {
    pub fn to_byte(self) -> u8 {
        match self {
            DbaseFieldType::Character => b'C',
            DbaseFieldType::Number => b'N',
            DbaseFieldType::Float => b'F',
            DbaseFieldType::Date => b'D',
            DbaseFieldType::Logical => b'L',
            DbaseFieldType::DateTime => b'T',
        }
    }

    pub fn from_byte(tag: u8) -> Option<Self> {
        match tag {
            b'C' => Some(DbaseFieldType::Character),
            b'N' => Some(DbaseFieldType::Number),
            b'F' => Some(DbaseFieldType::Float),
            b'D' => Some(DbaseFieldType::Date),
            b'L' => Some(DbaseFieldType::Logical),
            b'T' => Some(DbaseFieldType::DateTime),
            _ => None,
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(self) -> &'static str {
        match self {
            DbaseFieldType::Character => "character",
            DbaseFieldType::Number => "number",
            DbaseFieldType::Float => "float",
            DbaseFieldType::Date => "date",
            DbaseFieldType::Logical => "logical",
            DbaseFieldType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for DbaseFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
