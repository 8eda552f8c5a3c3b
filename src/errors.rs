//! Error types for the dBase codec
//!
//! Error codes:
//! - DBF_INVALID_SCALAR (REJECT)
//! - DBF_INVALID_FIELD (REJECT)
//! - DBF_INVALID_FIELD_NAME (REJECT)
//! - DBF_TOO_MANY_FIELDS (REJECT)
//! - DBF_OFFSET_MISMATCH (REJECT)
//! - DBF_INVALID_SCHEMA (REJECT)
//! - DBF_INVALID_VALUE (REJECT)
//! - DBF_RANGE (REJECT)
//! - DBF_FORMAT (REJECT)
//! - DBF_INVALID_STATE (REJECT)
//! - DBF_NOT_SUPPORTED (REJECT)
//! - DBF_CONFIG (REJECT)
//! - DBF_INVALID_HEADER (FATAL)
//! - DBF_UNSUPPORTED_CODE_PAGE (FATAL)
//! - DBF_INVALID_RECORD (FATAL)
//! - DBF_END_OF_FILE_MARKER (FATAL)
//! - DBF_END_OF_STREAM (FATAL)
//! - DBF_IO (FATAL)
//!
//! Fatal errors leave the underlying stream at an undefined position; the
//! caller must not continue reading or writing it.

use std::fmt;
use std::io;

use thiserror::Error;

/// Severity of a codec error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call was rejected; nothing was consumed or the value was left untouched
    Reject,
    /// The stream is unusable after this error
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable error codes, one per `DbaseError` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbaseErrorCode {
    InvalidScalar,
    InvalidField,
    InvalidFieldName,
    TooManyFields,
    OffsetMismatch,
    InvalidSchema,
    InvalidValue,
    Range,
    Format,
    InvalidState,
    NotSupported,
    Config,
    InvalidHeader,
    UnsupportedCodePage,
    InvalidRecord,
    EndOfFileMarker,
    EndOfStream,
    Io,
}

impl DbaseErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            DbaseErrorCode::InvalidScalar => "DBF_INVALID_SCALAR",
            DbaseErrorCode::InvalidField => "DBF_INVALID_FIELD",
            DbaseErrorCode::InvalidFieldName => "DBF_INVALID_FIELD_NAME",
            DbaseErrorCode::TooManyFields => "DBF_TOO_MANY_FIELDS",
            DbaseErrorCode::OffsetMismatch => "DBF_OFFSET_MISMATCH",
            DbaseErrorCode::InvalidSchema => "DBF_INVALID_SCHEMA",
            DbaseErrorCode::InvalidValue => "DBF_INVALID_VALUE",
            DbaseErrorCode::Range => "DBF_RANGE",
            DbaseErrorCode::Format => "DBF_FORMAT",
            DbaseErrorCode::InvalidState => "DBF_INVALID_STATE",
            DbaseErrorCode::NotSupported => "DBF_NOT_SUPPORTED",
            DbaseErrorCode::Config => "DBF_CONFIG",
            DbaseErrorCode::InvalidHeader => "DBF_INVALID_HEADER",
            DbaseErrorCode::UnsupportedCodePage => "DBF_UNSUPPORTED_CODE_PAGE",
            DbaseErrorCode::InvalidRecord => "DBF_INVALID_RECORD",
            DbaseErrorCode::EndOfFileMarker => "DBF_END_OF_FILE_MARKER",
            DbaseErrorCode::EndOfStream => "DBF_END_OF_STREAM",
            DbaseErrorCode::Io => "DBF_IO",
        }
    }

    /// Returns the severity level for this code
    pub fn severity(&self) -> Severity {
        match self {
            DbaseErrorCode::InvalidHeader
            | DbaseErrorCode::UnsupportedCodePage
            | DbaseErrorCode::InvalidRecord
            | DbaseErrorCode::EndOfFileMarker
            | DbaseErrorCode::EndOfStream
            | DbaseErrorCode::Io => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for DbaseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Any error raised by the codec
#[derive(Debug, Error)]
pub enum DbaseError {
    /// A bounded scalar was constructed outside its domain
    #[error("invalid {kind}: {value}")]
    InvalidScalar { kind: &'static str, value: i64 },

    /// Field length/decimal/type combination violates the type rules
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid field name {name:?}: {reason}")]
    InvalidFieldName { name: String, reason: String },

    #[error("too many fields: {count} exceeds the maximum of {max}")]
    TooManyFields { count: usize, max: usize },

    /// Field offset does not continue the running offset of the fields before it
    #[error("field '{field}' declares offset {declared} but the running offset is {expected}")]
    OffsetMismatch {
        field: String,
        declared: i32,
        expected: i32,
    },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A value variant cannot be bound to the given field
    #[error("field '{field}' cannot back a {variant} value: {reason}")]
    InvalidValue {
        field: String,
        variant: &'static str,
        reason: String,
    },

    /// The value does not fit the field's capacity
    #[error("value out of range for field '{field}': {reason}")]
    Range { field: String, reason: String },

    /// Stored bytes do not match the variant's grammar
    #[error("format error in field '{field}': {reason}")]
    Format { field: String, reason: String },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("operation not supported: {0}")]
    NotSupported(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported code page 0x{0:02X}")]
    UnsupportedCodePage(u8),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The end-of-file marker was read where a record was expected
    #[error("end of file marker encountered where a record was expected")]
    EndOfFileMarker,

    #[error("unexpected end of stream: {0}")]
    EndOfStream(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DbaseError {
    pub fn invalid_scalar(kind: &'static str, value: impl Into<i64>) -> Self {
        Self::InvalidScalar {
            kind,
            value: value.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        variant: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            variant,
            reason: reason.into(),
        }
    }

    pub fn range(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Range {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader(reason.into())
    }

    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord(reason.into())
    }

    pub fn end_of_stream(context: impl Into<String>) -> Self {
        Self::EndOfStream(context.into())
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    /// Returns the error code
    pub fn code(&self) -> DbaseErrorCode {
        match self {
            DbaseError::InvalidScalar { .. } => DbaseErrorCode::InvalidScalar,
            DbaseError::InvalidField { .. } => DbaseErrorCode::InvalidField,
            DbaseError::InvalidFieldName { .. } => DbaseErrorCode::InvalidFieldName,
            DbaseError::TooManyFields { .. } => DbaseErrorCode::TooManyFields,
            DbaseError::OffsetMismatch { .. } => DbaseErrorCode::OffsetMismatch,
            DbaseError::InvalidSchema(_) => DbaseErrorCode::InvalidSchema,
            DbaseError::InvalidValue { .. } => DbaseErrorCode::InvalidValue,
            DbaseError::Range { .. } => DbaseErrorCode::Range,
            DbaseError::Format { .. } => DbaseErrorCode::Format,
            DbaseError::InvalidState(_) => DbaseErrorCode::InvalidState,
            DbaseError::NotSupported(_) => DbaseErrorCode::NotSupported,
            DbaseError::Config(_) => DbaseErrorCode::Config,
            DbaseError::InvalidHeader(_) => DbaseErrorCode::InvalidHeader,
            DbaseError::UnsupportedCodePage(_) => DbaseErrorCode::UnsupportedCodePage,
            DbaseError::InvalidRecord(_) => DbaseErrorCode::InvalidRecord,
            DbaseError::EndOfFileMarker => DbaseErrorCode::EndOfFileMarker,
            DbaseError::EndOfStream(_) => DbaseErrorCode::EndOfStream,
            DbaseError::Io(_) => DbaseErrorCode::Io,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns whether the underlying stream must be abandoned
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for codec operations
pub type DbaseResult<T> = Result<T, DbaseError>;
