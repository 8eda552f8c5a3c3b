//! Blocking read/write helpers shared by the header, record and value codecs.

use std::io::{ErrorKind, Read, Write};

use crate::errors::{DbaseError, DbaseResult};

/// Fills `buf` completely or fails with `EndOfStream`.
pub(crate) fn read_exact_or_eos<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    context: &str,
) -> DbaseResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => DbaseError::end_of_stream(format!(
            "{}: expected {} bytes",
            context,
            buf.len()
        )),
        _ => DbaseError::Io(e),
    })
}

/// Reads `len` bytes into a fresh buffer or fails with `EndOfStream`.
pub(crate) fn read_vec<R: Read>(reader: &mut R, len: usize, context: &str) -> DbaseResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    read_exact_or_eos(reader, &mut buf, context)?;
    Ok(buf)
}

/// Reads a single byte, returning `None` at a clean end of stream.
pub(crate) fn read_optional_byte<R: Read>(reader: &mut R) -> DbaseResult<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DbaseError::Io(e)),
        }
    }
}

/// Reads a single byte or fails with `EndOfStream`.
pub(crate) fn read_byte<R: Read>(reader: &mut R, context: &str) -> DbaseResult<u8> {
    let mut buf = [0u8; 1];
    read_exact_or_eos(reader, &mut buf, context)?;
    Ok(buf[0])
}

pub(crate) fn write_all<W: Write>(writer: &mut W, bytes: &[u8]) -> DbaseResult<()> {
    writer.write_all(bytes).map_err(DbaseError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbaseErrorCode;
    use std::io::Cursor;

    #[test]
    fn test_short_read_is_end_of_stream() {
        let mut cursor = Cursor::new(vec![1u8, 2]);
        let err = read_vec(&mut cursor, 4, "field").unwrap_err();
        assert_eq!(err.code(), DbaseErrorCode::EndOfStream);
        assert!(err.to_string().contains("field"));
    }

    #[test]
    fn test_optional_byte_at_end() {
        let mut cursor = Cursor::new(vec![0x1Au8]);
        assert_eq!(read_optional_byte(&mut cursor).unwrap(), Some(0x1A));
        assert_eq!(read_optional_byte(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_read_byte_requires_data() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(read_byte(&mut cursor, "flag").is_err());
    }
}
