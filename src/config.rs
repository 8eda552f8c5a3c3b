//! Reader/writer configuration
//!
//! Loadable from JSON. Every field has a default, so `{}` is a valid
//! configuration.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::errors::{DbaseError, DbaseResult};

/// Configuration for file-backed enumerators and writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbaseConfig {
    /// WHATWG encoding label for character data whose code page has no
    /// text encoding mapping.
    pub fallback_encoding: String,
    /// Buffer size in bytes for file readers and writers.
    pub buffer_capacity: usize,
    /// Whether `close()` writes the end-of-file marker when the caller has
    /// not written it.
    pub write_end_of_file_marker_on_close: bool,
}

impl Default for DbaseConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: Self::DEFAULT_FALLBACK_ENCODING.to_string(),
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            write_end_of_file_marker_on_close: false, // caller writes the marker
        }
    }
}

impl DbaseConfig {
    pub const DEFAULT_FALLBACK_ENCODING: &'static str = "windows-1252";
    pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

    /// Config whose writers always finish the file with the end-of-file
    /// marker.
    pub fn with_end_of_file_marker() -> Self {
        Self {
            write_end_of_file_marker_on_close: true,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> DbaseResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DbaseError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> DbaseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DbaseError::Config(e.to_string()))
    }

    pub fn validate(&self) -> DbaseResult<()> {
        self.fallback_encoding()?;
        if self.buffer_capacity == 0 {
            return Err(DbaseError::Config(
                "buffer_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Resolves the fallback encoding label.
    pub fn fallback_encoding(&self) -> DbaseResult<&'static Encoding> {
        Encoding::for_label(self.fallback_encoding.as_bytes()).ok_or_else(|| {
            DbaseError::Config(format!(
                "unknown fallback encoding {:?}",
                self.fallback_encoding
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;

    #[test]
    fn test_defaults() {
        let config = DbaseConfig::default();
        assert_eq!(config.fallback_encoding, "windows-1252");
        assert_eq!(config.buffer_capacity, 8192);
        assert!(!config.write_end_of_file_marker_on_close);
        assert_eq!(
            config.fallback_encoding().unwrap(),
            encoding_rs::WINDOWS_1252
        );
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            DbaseConfig::from_json_str("{}").unwrap(),
            DbaseConfig::default()
        );
    }

    #[test]
    fn test_partial_json() {
        let config = DbaseConfig::from_json_str(
            r#"{"fallback_encoding": "ibm866", "write_end_of_file_marker_on_close": true}"#,
        )
        .unwrap();
        assert_eq!(config.fallback_encoding().unwrap(), encoding_rs::IBM866);
        assert!(config.write_end_of_file_marker_on_close);
        assert_eq!(config.buffer_capacity, DbaseConfig::DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let err = DbaseConfig::from_json_str(r#"{"fallback_encoding": "cp437"}"#).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::Config);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = DbaseConfig::from_json_str(r#"{"buffer_capacity": 0}"#).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::Config);
    }

    #[test]
    fn test_malformed_json() {
        let err = DbaseConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::Config);
    }

    #[test]
    fn test_json_round_trip() {
        let config = DbaseConfig::with_end_of_file_marker();
        let json = config.to_json_string().unwrap();
        assert_eq!(DbaseConfig::from_json_str(&json).unwrap(), config);
    }
}
