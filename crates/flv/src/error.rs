//! Error types.

use flvprobe_amf0::Amf0Error;
use flvprobe_bytes_util::CursorError;

/// Error type for FLV processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlvError {
    /// Not enough bytes for the next field, or a tag declares more payload
    /// than the buffer holds.
    #[error("not enough bytes: needed {needed}, {available} remaining")]
    Truncated {
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },
    /// The FLV signature (magic bytes) is invalid.
    #[error("invalid signature in header: {0:02x?}")]
    BadSignature([u8; 3]),
    /// The data offset in the FLV header is smaller than the header or points
    /// past the end of the buffer.
    #[error("invalid data offset: {0}")]
    InvalidDataOffset(u32),
    /// The previous tag size field does not match the size of the previous tag.
    #[error("previous tag size mismatch at offset {offset}: expected {expected}, found {found}")]
    PreviousTagSizeMismatch {
        /// Offset of the previous tag size field.
        offset: usize,
        /// Header size plus data size of the previous tag.
        expected: u32,
        /// Value in the file.
        found: u32,
    },
    /// A cursor string read found invalid UTF-8.
    ///
    /// The FLV structures read no text themselves, so demuxing does not
    /// produce this. It completes the conversion from
    /// [`CursorError`](flvprobe_bytes_util::CursorError) for code that reads
    /// tag payload strings with the same cursor. Text in script data is
    /// reported through [`FlvError::Script`].
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(std::str::Utf8Error),
    /// A value in a script data tag could not be decoded.
    #[error("script data tag at offset {offset}: {source}")]
    Script {
        /// Offset of the tag header.
        offset: usize,
        /// The AMF0 error.
        #[source]
        source: Amf0Error,
    },
}

impl From<CursorError> for FlvError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::InsufficientBytes { needed, available } => Self::Truncated { needed, available },
            CursorError::InvalidUtf8(err) => Self::InvalidUtf8(err),
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use flvprobe_bytes_util::ByteCursor;

    use super::*;

    #[test]
    fn from_cursor_error() {
        let err: FlvError = CursorError::InsufficientBytes { needed: 3, available: 1 }.into();
        assert_eq!(err, FlvError::Truncated { needed: 3, available: 1 });

        let data = [0xff, 0xfe];
        let utf8 = ByteCursor::new(&data).read_string(2).unwrap_err();
        assert!(matches!(FlvError::from(utf8), FlvError::InvalidUtf8(_)));
    }

    #[test]
    fn script_error_keeps_source() {
        use std::error::Error;

        let err = FlvError::Script {
            offset: 13,
            source: Amf0Error::InvalidEofMarker,
        };
        assert_eq!(err.to_string(), "script data tag at offset 13: malformed object end marker");
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("malformed object end marker".to_owned())
        );
    }
}
