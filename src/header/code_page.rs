//! Language-driver byte stored at offset 29 of the header.

use std::fmt;

use encoding_rs::Encoding;
use tracing::warn;

use crate::errors::{DbaseError, DbaseResult};

struct CodePageEntry {
    value: u8,
    name: &'static str,
    windows_code_page: Option<u16>,
    /// WHATWG label understood by `encoding_rs`
    encoding_label: Option<&'static str>,
}

const fn entry(
    value: u8,
    name: &'static str,
    windows_code_page: Option<u16>,
    encoding_label: Option<&'static str>,
) -> CodePageEntry {
    CodePageEntry {
        value,
        name,
        windows_code_page,
        encoding_label,
    }
}

static CODE_PAGES: &[CodePageEntry] = &[
    entry(0x00, "Unspecified", None, None),
    entry(0x01, "US MS-DOS", Some(437), None),
    entry(0x02, "International MS-DOS", Some(850), None),
    entry(0x03, "Windows ANSI", Some(1252), Some("windows-1252")),
    entry(0x04, "Standard Macintosh", Some(10000), Some("macintosh")),
    entry(0x57, "Western European ANSI", Some(1252), Some("windows-1252")),
    entry(0x64, "Eastern European MS-DOS", Some(852), None),
    entry(0x65, "Russian MS-DOS", Some(866), Some("ibm866")),
    entry(0x66, "Nordic MS-DOS", Some(865), None),
    entry(0x67, "Icelandic MS-DOS", Some(861), None),
    entry(0x6A, "Greek MS-DOS", Some(737), None),
    entry(0x6B, "Turkish MS-DOS", Some(857), None),
    entry(0x78, "Traditional Chinese", Some(950), Some("big5")),
    entry(0x79, "Korean", Some(949), Some("euc-kr")),
    entry(0x7A, "Simplified Chinese", Some(936), Some("gbk")),
    entry(0x7B, "Japanese", Some(932), Some("shift_jis")),
    entry(0x7C, "Thai", Some(874), Some("windows-874")),
    entry(0x7D, "Hebrew", Some(1255), Some("windows-1255")),
    entry(0x7E, "Arabic", Some(1256), Some("windows-1256")),
    entry(0x96, "Russian Macintosh", Some(10007), Some("x-mac-cyrillic")),
    entry(0x97, "Macintosh EE", Some(10029), None),
    entry(0x98, "Greek Macintosh", Some(10006), None),
    entry(0xC8, "Eastern European Windows", Some(1250), Some("windows-1250")),
    entry(0xC9, "Russian Windows", Some(1251), Some("windows-1251")),
    entry(0xCA, "Turkish Windows", Some(1254), Some("windows-1254")),
    entry(0xCB, "Greek Windows", Some(1253), Some("windows-1253")),
];

/// A supported code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DbaseCodePage(u8);

impl DbaseCodePage {
    pub const UNSPECIFIED: DbaseCodePage = DbaseCodePage(0x00);
    pub const WINDOWS_ANSI: DbaseCodePage = DbaseCodePage(0x03);
    pub const WESTERN_EUROPEAN_ANSI: DbaseCodePage = DbaseCodePage(0x57);

    /// Fails with `UnsupportedCodePage` for bytes outside the table.
    pub fn new(value: u8) -> DbaseResult<Self> {
        if Self::is_supported(value) {
            Ok(Self(value))
        } else {
            Err(DbaseError::UnsupportedCodePage(value))
        }
    }

    pub fn is_supported(value: u8) -> bool {
        CODE_PAGES.iter().any(|e| e.value == value)
    }

    /// Every supported code page, in byte order.
    pub fn all() -> impl Iterator<Item = DbaseCodePage> {
        CODE_PAGES.iter().map(|e| DbaseCodePage(e.value))
    }

    fn entry(self) -> &'static CodePageEntry {
        // construction guarantees membership
        CODE_PAGES
            .iter()
            .find(|e| e.value == self.0)
            .unwrap_or(&CODE_PAGES[0])
    }

    pub fn to_byte(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn windows_code_page(self) -> Option<u16> {
        self.entry().windows_code_page
    }

    /// Text encoding for character data, if `encoding_rs` knows this page.
    ///
    /// `encoding_rs` only implements the WHATWG encodings, so the DOS pages
    /// 437, 850, 852, 865, 861, 737 and 857 (bytes `0x01`, `0x02`, `0x64`,
    /// `0x66`, `0x67`, `0x6A`, `0x6B`) and the Macintosh pages 10029 and
    /// 10006 (`0x97`, `0x98`) return `None`.
    pub fn encoding(self) -> Option<&'static Encoding> {
        self.entry()
            .encoding_label
            .and_then(|label| Encoding::for_label(label.as_bytes()))
    }

    /// Text encoding for character data, falling back when unmapped.
    ///
    /// For the pages [`encoding`](Self::encoding) cannot map, text is read
    /// and written with `fallback` instead. Only ASCII survives that
    /// unchanged; other bytes decode to whatever `fallback` assigns them,
    /// which is not the character the file's code page means.
    pub fn encoding_or(self, fallback: &'static Encoding) -> &'static Encoding {
        match self.encoding() {
            Some(encoding) => encoding,
            None => {
                warn!(
                    event = "DBF_CODE_PAGE_FALLBACK",
                    code_page = self.0,
                    name = self.name(),
                    fallback = fallback.name(),
                    "code page has no text encoding mapping, using fallback"
                );
                fallback
            }
        }
    }
}

impl Default for DbaseCodePage {
    fn default() -> Self {
        Self::WINDOWS_ANSI
    }
}

impl TryFrom<u8> for DbaseCodePage {
    type Error = DbaseError;

    fn try_from(value: u8) -> DbaseResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for DbaseCodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} ({})", self.0, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;

    #[test]
    fn test_supported_set() {
        assert_eq!(DbaseCodePage::all().count(), 26);
        assert!(DbaseCodePage::new(0x57).is_ok());
        assert!(DbaseCodePage::new(0x00).is_ok());
        let err = DbaseCodePage::new(0x05).unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::UnsupportedCodePage);
    }

    #[test]
    fn test_table_bytes_are_unique() {
        let mut seen: Vec<u8> = DbaseCodePage::all().map(|c| c.to_byte()).collect();
        seen.dedup();
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn test_every_label_resolves() {
        for page in DbaseCodePage::all() {
            if page.entry().encoding_label.is_some() {
                assert!(page.encoding().is_some(), "{page} label is unknown");
            }
        }
    }

    #[test]
    fn test_encoding_mapping() {
        let ansi = DbaseCodePage::WESTERN_EUROPEAN_ANSI;
        assert_eq!(ansi.encoding(), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(ansi.windows_code_page(), Some(1252));

        let dos = DbaseCodePage::new(0x01).unwrap();
        assert_eq!(dos.encoding(), None);
        assert_eq!(
            dos.encoding_or(encoding_rs::WINDOWS_1252),
            encoding_rs::WINDOWS_1252
        );
    }

    #[test]
    fn test_oem_and_mac_pages_use_fallback() {
        let oem = [0x01, 0x02, 0x64, 0x66, 0x67, 0x6A, 0x6B, 0x97, 0x98];
        for byte in oem {
            let page = DbaseCodePage::new(byte).unwrap();
            assert!(page.windows_code_page().is_some());
            assert_eq!(page.encoding(), None, "{page}");
            assert_eq!(page.encoding_or(encoding_rs::IBM866), encoding_rs::IBM866);
        }

        let unmapped: Vec<u8> = DbaseCodePage::all()
            .filter(|page| page.encoding().is_none())
            .map(DbaseCodePage::to_byte)
            .collect();
        let mut expected = vec![0x00];
        expected.extend(oem);
        assert_eq!(unmapped, expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DbaseCodePage::new(0xC9).unwrap().to_string(),
            "0xC9 (Russian Windows)"
        );
    }
}
