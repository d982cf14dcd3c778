//! FLV video tag headers.

use std::fmt;

use flvprobe_amf0::{Describe, write_indent};
use flvprobe_bytes_util::ByteCursor;
use nutype_enum::nutype_enum;

use crate::error::FlvError;

nutype_enum! {
    /// FLV Frame Type
    ///
    /// This enum represents the different types of frames in a FLV file.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum VideoFrameType(u8) {
        /// A keyframe is a frame that is a complete representation of the video content.
        KeyFrame = 1,
        /// An interframe is a frame that is a partial representation of the video content.
        InterFrame = 2,
        /// A disposable interframe (h263 only).
        DisposableInterFrame = 3,
        /// A generated keyframe (reserved for server use only).
        GeneratedKeyFrame = 4,
        /// A video info or command frame.
        Command = 5,
    }
}

impl VideoFrameType {
    /// Display name of the frame type.
    pub fn name(self) -> &'static str {
        match self {
            Self::KeyFrame => "keyframe(for avc, a seekable frame)",
            Self::InterFrame => "inter frame(for avc, a non-seekable frame)",
            Self::DisposableInterFrame => "disposable inter frame(H263 only)",
            Self::GeneratedKeyFrame => "generated key frame(reserved for server use only)",
            Self::Command => "video info/command frame",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV Video Codec ID
    ///
    /// Denotes the different types of video codecs.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum VideoCodecId(u8) {
        /// JPEG (currently unused)
        Jpeg = 1,
        /// Sorenson H.263
        SorensonH263 = 2,
        /// Screen Video
        ScreenVideo = 3,
        /// On2 VP6
        On2VP6 = 4,
        /// On2 VP6 with alpha channel
        On2VP6WithAlphaChannel = 5,
        /// Screen Video Version 2
        ScreenVideoVersion2 = 6,
        /// AVC (H.264)
        Avc = 7,
    }
}

impl VideoCodecId {
    /// Display name of the codec.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg(currently unused)",
            Self::SorensonH263 => "sorenson H263",
            Self::ScreenVideo => "screen video",
            Self::On2VP6 => "on2 VP6",
            Self::On2VP6WithAlphaChannel => "on2 vp6 with alpha channel",
            Self::ScreenVideoVersion2 => "screen video version 2",
            Self::Avc => "avc",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV AVC Packet Type
    ///
    /// The AVC packet type is used to determine if the video data is a sequence
    /// header or a NALU.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum AvcPacketType(u8) {
        /// AVC sequence header
        SeqHdr = 0,
        /// AVC NALU
        Nalu = 1,
        /// AVC end of sequence (lower level NALU sequence ender is not required or supported)
        EndOfSequence = 2,
    }
}

impl AvcPacketType {
    /// Display name of the packet type.
    pub fn name(self) -> &'static str {
        match self {
            Self::SeqHdr => "avc sequence header",
            Self::Nalu => "avc nalu",
            Self::EndOfSequence => "avc end of sequence",
            _ => "reserved",
        }
    }
}

/// The AVC extension of the video tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvcPacketHeader {
    /// The AVC packet type.
    pub avc_packet_type: AvcPacketType,
    /// Composition time offset. Zero unless the packet is a NALU.
    pub composition_time: u32,
}

/// FLV `VideoTagHeader`
///
/// Only the header is interpreted. The codec payload that follows (NAL units,
/// decoder configuration records) is skipped by the demuxer.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.4.3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTagHeader {
    /// The frame type of the video data. (4 bits)
    pub frame_type: VideoFrameType,
    /// The codec of the video data. (4 bits)
    pub codec_id: VideoCodecId,
    /// Present when `codec_id` is [`VideoCodecId::Avc`].
    pub avc: Option<AvcPacketHeader>,
}

impl VideoTagHeader {
    /// Demux the video tag header from the given cursor.
    pub fn demux(cursor: &mut ByteCursor<'_>) -> Result<Self, FlvError> {
        let first_byte = cursor.read_u8()?;
        let frame_type = VideoFrameType::from(first_byte >> 4); // 0b1111_0000
        let codec_id = VideoCodecId::from(first_byte & 0b0000_1111);

        let avc = if codec_id == VideoCodecId::Avc {
            let avc_packet_type = AvcPacketType::from(cursor.read_u8()?);
            let composition_time = cursor.read_u24()?;

            Some(AvcPacketHeader {
                avc_packet_type,
                composition_time,
            })
        } else {
            None
        };

        Ok(Self {
            frame_type,
            codec_id,
            avc,
        })
    }
}

impl Describe for VideoTagHeader {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "video tag header:")?;
        write_indent(out, level + 1)?;
        writeln!(out, "frame_type: {}", self.frame_type.name())?;
        write_indent(out, level + 1)?;
        writeln!(out, "codec_id: {}", self.codec_id.name())?;

        if let Some(avc) = &self.avc {
            write_indent(out, level + 1)?;
            writeln!(out, "avc_packet_type: {}", avc.avc_packet_type.name())?;
            write_indent(out, level + 1)?;
            writeln!(out, "composition_time: {}", avc.composition_time)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn keyframe_avc() {
        let data = [0x17, 0x01, 0x00, 0x00, 0x28];
        let mut cursor = ByteCursor::new(&data);

        let header = VideoTagHeader::demux(&mut cursor).unwrap();
        assert_eq!(header.frame_type, VideoFrameType::KeyFrame);
        assert_eq!(header.codec_id, VideoCodecId::Avc);
        assert_eq!(
            header.avc,
            Some(AvcPacketHeader {
                avc_packet_type: AvcPacketType::Nalu,
                composition_time: 40,
            })
        );
        assert!(cursor.is_empty());
    }

    #[test]
    fn non_avc_has_no_extension() {
        let data = [0x22, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&data);

        let header = VideoTagHeader::demux(&mut cursor).unwrap();
        assert_eq!(header.frame_type, VideoFrameType::InterFrame);
        assert_eq!(header.codec_id, VideoCodecId::SorensonH263);
        assert_eq!(header.avc, None);
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn avc_extension_truncated() {
        let data = [0x17, 0x00, 0x00, 0x00];
        assert_eq!(
            VideoTagHeader::demux(&mut ByteCursor::new(&data)).unwrap_err(),
            FlvError::Truncated { needed: 3, available: 2 }
        );
    }

    #[test]
    fn names() {
        let cases = [
            (0x01, VideoFrameType::KeyFrame, "VideoFrameType::KeyFrame"),
            (0x02, VideoFrameType::InterFrame, "VideoFrameType::InterFrame"),
            (0x03, VideoFrameType::DisposableInterFrame, "VideoFrameType::DisposableInterFrame"),
            (0x04, VideoFrameType::GeneratedKeyFrame, "VideoFrameType::GeneratedKeyFrame"),
            (0x05, VideoFrameType::Command, "VideoFrameType::Command"),
        ];

        for (value, expected, name) in cases {
            let frame_type = VideoFrameType::from(value);
            assert_eq!(frame_type, expected);
            assert_eq!(format!("{:?}", frame_type), name);
        }

        assert_eq!(VideoFrameType::from(0).name(), "reserved");
        assert_eq!(VideoCodecId::from(4).name(), "on2 VP6");
        assert_eq!(VideoCodecId::from(12).name(), "reserved");
        assert_eq!(AvcPacketType::from(2).name(), "avc end of sequence");
    }

    #[test]
    fn describe() {
        let header = VideoTagHeader {
            frame_type: VideoFrameType::KeyFrame,
            codec_id: VideoCodecId::Avc,
            avc: Some(AvcPacketHeader {
                avc_packet_type: AvcPacketType::SeqHdr,
                composition_time: 0,
            }),
        };

        insta::assert_snapshot!(header.describe(), @r"
        video tag header:
            frame_type: keyframe(for avc, a seekable frame)
            codec_id: avc
            avc_packet_type: avc sequence header
            composition_time: 0
        ");
    }
}
