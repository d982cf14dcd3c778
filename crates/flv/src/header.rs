//! FLV file header.

use std::fmt;

use flvprobe_amf0::{Describe, write_indent};
use flvprobe_bytes_util::ByteCursor;

use crate::error::FlvError;

/// The three magic bytes every FLV file starts with.
pub const FLV_SIGNATURE: [u8; 3] = *b"FLV";

/// Size of the header fields, without any extension up to the data offset.
pub const FLV_HEADER_SIZE: u32 = 9;

/// The FLV header
/// Whenever a FLV file is read these are the first 9 bytes of the file.
///
/// Defined by:
/// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV Header - Page 8)
/// - video_file_format_spec_v10_1.pdf (Annex E.2 - The FLV Header)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvHeader {
    /// The version of the FLV file.
    pub version: u8,
    /// Whether the FLV file contains audio tags.
    pub has_audio: bool,
    /// Whether the FLV file contains video tags.
    pub has_video: bool,
    /// Offset of the first tag from the start of the file.
    pub data_offset: u32,
}

impl FlvHeader {
    /// Demux the FLV header from the given cursor.
    ///
    /// The cursor is left at `data_offset`, so headers with extra bytes after
    /// the standard fields are skipped.
    #[allow(clippy::unusual_byte_groupings)]
    pub fn demux(cursor: &mut ByteCursor<'_>) -> Result<Self, FlvError> {
        let start = cursor.offset();

        let signature = [cursor.read_u8()?, cursor.read_u8()?, cursor.read_u8()?];
        if signature != FLV_SIGNATURE {
            return Err(FlvError::BadSignature(signature));
        }

        let version = cursor.read_u8()?;
        let flags = cursor.read_u8()?;
        // the remaining flag bits are reserved
        let has_audio = (flags & 0b00000_1_0_0) != 0;
        let has_video = (flags & 0b00000_0_0_1) != 0;

        let data_offset = cursor.read_u32()?;
        let consumed = cursor.offset() - start;

        let extra = (data_offset as usize)
            .checked_sub(consumed)
            .filter(|extra| *extra <= cursor.remaining())
            .ok_or(FlvError::InvalidDataOffset(data_offset))?;

        cursor.skip(extra as isize);

        Ok(FlvHeader {
            version,
            has_audio,
            has_video,
            data_offset,
        })
    }
}

impl Describe for FlvHeader {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "flv header:")?;
        write_indent(out, level + 1)?;
        writeln!(out, "version: {}", self.version)?;
        write_indent(out, level + 1)?;
        writeln!(out, "has_audio: {}", self.has_audio)?;
        write_indent(out, level + 1)?;
        writeln!(out, "has_video: {}", self.has_video)?;
        write_indent(out, level + 1)?;
        writeln!(out, "data_offset: {}", self.data_offset)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn both_flags() {
        let data = b"FLV\x01\x05\x00\x00\x00\x09";
        let mut cursor = ByteCursor::new(data);

        let header = FlvHeader::demux(&mut cursor).unwrap();
        assert_eq!(
            header,
            FlvHeader {
                version: 1,
                has_audio: true,
                has_video: true,
                data_offset: 9,
            }
        );
        assert!(cursor.is_empty());
    }

    #[test]
    fn reserved_bits_ignored() {
        let data = b"FLV\x01\xfa\x00\x00\x00\x09";
        let header = FlvHeader::demux(&mut ByteCursor::new(data)).unwrap();

        assert!(!header.has_audio);
        assert!(!header.has_video);
    }

    #[test]
    fn bad_signature() {
        let data = b"FLX\x01\x05\x00\x00\x00\x09";
        assert_eq!(
            FlvHeader::demux(&mut ByteCursor::new(data)).unwrap_err(),
            FlvError::BadSignature(*b"FLX")
        );
    }

    #[test]
    fn extended_header_is_skipped() {
        let data = b"FLV\x01\x01\x00\x00\x00\x0c\xaa\xbb\xcc\x00";
        let mut cursor = ByteCursor::new(data);

        let header = FlvHeader::demux(&mut cursor).unwrap();
        assert_eq!(header.data_offset, 12);
        assert_eq!(cursor.offset(), 12);
        assert_eq!(cursor.read_u8().unwrap(), 0);
    }

    #[test]
    fn invalid_data_offset() {
        let too_small = b"FLV\x01\x05\x00\x00\x00\x08";
        assert_eq!(
            FlvHeader::demux(&mut ByteCursor::new(too_small)).unwrap_err(),
            FlvError::InvalidDataOffset(8)
        );

        let past_end = b"FLV\x01\x05\x00\x00\x00\x20";
        assert_eq!(
            FlvHeader::demux(&mut ByteCursor::new(past_end)).unwrap_err(),
            FlvError::InvalidDataOffset(0x20)
        );
    }

    #[test]
    fn truncated() {
        let data = b"FLV\x01\x05\x00\x00\x00";
        assert_eq!(
            FlvHeader::demux(&mut ByteCursor::new(data)).unwrap_err(),
            FlvError::Truncated { needed: 4, available: 3 }
        );
    }

    #[test]
    fn describe() {
        let header = FlvHeader {
            version: 1,
            has_audio: false,
            has_video: true,
            data_offset: 9,
        };

        insta::assert_snapshot!(header.describe(), @r"
        flv header:
            version: 1
            has_audio: false
            has_video: true
            data_offset: 9
        ");
    }
}
