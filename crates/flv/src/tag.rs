//! FLV Tag processing

use std::fmt;

use flvprobe_amf0::{Describe, write_indent};
use flvprobe_bytes_util::ByteCursor;
use nutype_enum::nutype_enum;

use crate::audio::AudioTagHeader;
use crate::error::FlvError;
use crate::script::ScriptData;
use crate::video::VideoTagHeader;

/// Size of the fixed tag header that precedes every payload.
pub const FLV_TAG_HEADER_SIZE: u32 = 11;

nutype_enum! {
    /// FLV Tag Type
    ///
    /// This is the type of the tag.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.1
    ///
    /// The 3 types that are supported are:
    /// - Audio(8)
    /// - Video(9)
    /// - ScriptData(18)
    pub enum FlvTagType(u8) {
        /// [`AudioTagHeader`]
        Audio = 8,
        /// [`VideoTagHeader`]
        Video = 9,
        /// [`ScriptData`]
        ScriptData = 18,
    }
}

impl FlvTagType {
    /// Display name of the tag type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::ScriptData => "script",
            _ => "reserved",
        }
    }
}

/// The fixed 11-byte header of an FLV tag.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.4.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvTagHeader {
    /// The type of the payload. Values other than the three known types are
    /// kept as is.
    pub tag_type: FlvTagType,
    /// Size of the payload following the header. (24 bits)
    pub data_size: u32,
    /// Lower 24 bits of the timestamp in milliseconds.
    pub timestamp: u32,
    /// Upper 8 bits of the timestamp.
    pub timestamp_extended: u8,
    /// The stream id, always 0 in files. (24 bits)
    pub stream_id: u32,
}

impl FlvTagHeader {
    /// Demux the tag header from the given cursor.
    pub fn demux(cursor: &mut ByteCursor<'_>) -> Result<Self, FlvError> {
        let tag_type = FlvTagType::from(cursor.read_u8()?);
        let data_size = cursor.read_u24()?;
        let timestamp = cursor.read_u24()?;
        let timestamp_extended = cursor.read_u8()?;
        let stream_id = cursor.read_u24()?;

        Ok(Self {
            tag_type,
            data_size,
            timestamp,
            timestamp_extended,
            stream_id,
        })
    }

    /// The full 32-bit timestamp in milliseconds.
    pub fn timestamp_full(&self) -> u32 {
        ((self.timestamp_extended as u32) << 24) | self.timestamp
    }

    /// Size of the tag on the wire, which the following previous tag size
    /// field repeats.
    pub fn tag_size(&self) -> u32 {
        FLV_TAG_HEADER_SIZE + self.data_size
    }
}

impl Describe for FlvTagHeader {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "flv tag header:")?;
        write_indent(out, level + 1)?;
        writeln!(out, "tag_type: {}", self.tag_type.name())?;
        write_indent(out, level + 1)?;
        writeln!(out, "data_size: {}", self.data_size)?;
        write_indent(out, level + 1)?;
        writeln!(out, "timestamp: {}", self.timestamp)?;
        write_indent(out, level + 1)?;
        writeln!(out, "timestamp_extended: {}", self.timestamp_extended)?;
        write_indent(out, level + 1)?;
        writeln!(out, "timestamp_full: {}", self.timestamp_full())?;
        write_indent(out, level + 1)?;
        writeln!(out, "stream_id: {}", self.stream_id)
    }
}

/// The interpreted start of a tag payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FlvTagPayload {
    /// Video tag, only the header is read.
    Video(VideoTagHeader),
    /// Audio tag, only the header is read.
    Audio(AudioTagHeader),
    /// Script data tag, fully decoded.
    Script(ScriptData),
    /// A tag type without an interpreter. The payload is skipped.
    Unknown,
}

impl Describe for FlvTagPayload {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        match self {
            Self::Video(header) => header.describe_to(out, level),
            Self::Audio(header) => header.describe_to(out, level),
            Self::Script(script) => script.describe_to(out, level),
            Self::Unknown => writeln!(out, "unknown payload"),
        }
    }
}

/// An FLV tag as yielded by [`FlvDemuxer`](crate::demuxer::FlvDemuxer).
///
/// Defined by:
/// - Legacy FLV spec, Annex E.3 and E.4.1
#[derive(Debug, Clone, PartialEq)]
pub struct FlvTag {
    /// Offset of the tag header in the buffer.
    pub offset: usize,
    /// The previous tag size field read before this tag.
    pub previous_tag_size: u32,
    /// The tag header.
    pub header: FlvTagHeader,
    /// The interpreted payload.
    pub payload: FlvTagPayload,
}

impl Describe for FlvTag {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "flv tag:")?;
        write_indent(out, level + 1)?;
        writeln!(out, "offset: {}", self.offset)?;
        write_indent(out, level + 1)?;
        writeln!(out, "previous_tag_size: {}", self.previous_tag_size)?;
        write_indent(out, level + 1)?;
        self.header.describe_to(out, level + 1)?;
        write_indent(out, level + 1)?;
        self.payload.describe_to(out, level + 1)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::video::{VideoCodecId, VideoFrameType};

    #[test]
    fn tag_type() {
        let cases = [
            (0x08, FlvTagType::Audio, "FlvTagType::Audio"),
            (0x09, FlvTagType::Video, "FlvTagType::Video"),
            (0x12, FlvTagType::ScriptData, "FlvTagType::ScriptData"),
        ];

        for (value, expected, name) in cases {
            let tag_type = FlvTagType::from(value);
            assert_eq!(tag_type, expected);
            assert_eq!(format!("{:?}", tag_type), name);
        }

        assert_eq!(FlvTagType::ScriptData.name(), "script");
        assert_eq!(FlvTagType::from(0x0f).name(), "reserved");
    }

    #[test]
    fn header() {
        #[rustfmt::skip]
        let data = [
            0x09, // tag type
            0x00, 0x01, 0x02, // data size
            0x12, 0x34, 0x56, // timestamp
            0x01, // timestamp extended
            0x00, 0x00, 0x00, // stream id
            0xff,
        ];
        let mut cursor = ByteCursor::new(&data);

        let header = FlvTagHeader::demux(&mut cursor).unwrap();
        assert_eq!(header.tag_type, FlvTagType::Video);
        assert_eq!(header.data_size, 0x0102);
        assert_eq!(header.timestamp, 0x123456);
        assert_eq!(header.timestamp_extended, 1);
        assert_eq!(header.timestamp_full(), 0x01123456);
        assert_eq!(header.stream_id, 0);
        assert_eq!(header.tag_size(), 11 + 0x0102);
        assert_eq!(cursor.offset(), 11);
    }

    #[test]
    fn header_truncated() {
        let data = [0x08, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            FlvTagHeader::demux(&mut ByteCursor::new(&data)).unwrap_err(),
            FlvError::Truncated { needed: 3, available: 2 }
        );
    }

    #[test]
    fn describe() {
        let tag = FlvTag {
            offset: 13,
            previous_tag_size: 0,
            header: FlvTagHeader {
                tag_type: FlvTagType::Video,
                data_size: 1,
                timestamp: 40,
                timestamp_extended: 0,
                stream_id: 0,
            },
            payload: FlvTagPayload::Video(VideoTagHeader {
                frame_type: VideoFrameType::InterFrame,
                codec_id: VideoCodecId::On2VP6,
                avc: None,
            }),
        };

        insta::assert_snapshot!(tag.describe(), @r"
        flv tag:
            offset: 13
            previous_tag_size: 0
            flv tag header:
                tag_type: video
                data_size: 1
                timestamp: 40
                timestamp_extended: 0
                timestamp_full: 40
                stream_id: 0
            video tag header:
                frame_type: inter frame(for avc, a non-seekable frame)
                codec_id: on2 VP6
        ");
    }
}
