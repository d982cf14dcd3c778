//! FLV audio tag headers.

use std::fmt;

use flvprobe_amf0::{Describe, write_indent};
use flvprobe_bytes_util::ByteCursor;
use nutype_enum::nutype_enum;

use crate::aac::AacSequenceHeader;
use crate::error::FlvError;

nutype_enum! {
    /// FLV Sound Format
    ///
    /// Denotes the type of the underlying data packet
    ///
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Audio tags)
    /// - video_file_format_spec_v10_1.pdf (Annex E.4.2.1 - AUDIODATA)
    pub enum SoundFormat(u8) {
        /// Linear PCM, platform endian
        LinearPcmPlatformEndian = 0,
        /// ADPCM
        Adpcm = 1,
        /// MP3
        Mp3 = 2,
        /// Linear PCM, little endian
        LinearPcmLittleEndian = 3,
        /// Nellymoser 16Khz Mono
        Nellymoser16KhzMono = 4,
        /// Nellymoser 8Khz Mono
        Nellymoser8KhzMono = 5,
        /// Nellymoser
        Nellymoser = 6,
        /// G.711 A-Law logarithmic PCM
        G711ALaw = 7,
        /// G.711 Mu-Law logarithmic PCM
        G711MuLaw = 8,
        /// Reserved
        Reserved = 9,
        /// AAC
        Aac = 10,
        /// Speex
        Speex = 11,
        /// Mp3 8Khz
        Mp38Khz = 14,
        /// Device specific sound
        DeviceSpecificSound = 15,
    }
}

impl SoundFormat {
    /// Display name of the sound format.
    pub fn name(self) -> &'static str {
        match self {
            Self::LinearPcmPlatformEndian => "LinearPCMPlatformEndian",
            Self::Adpcm => "ADPCM",
            Self::Mp3 => "MP3",
            Self::LinearPcmLittleEndian => "LinearPCMLittleEndian",
            Self::Nellymoser16KhzMono => "Nellymoser16KHZMono",
            Self::Nellymoser8KhzMono => "Nellymoser8KHZMono",
            Self::Nellymoser => "Nellymoser",
            Self::G711ALaw => "G711ALawLogarithmicPCM",
            Self::G711MuLaw => "G711muLawLogarithmicPCM",
            Self::Aac => "AAC",
            Self::Speex => "Speex",
            Self::Mp38Khz => "MP38KHZ",
            Self::DeviceSpecificSound => "DeviceSpecificSound",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV Sound Rate
    ///
    /// Denotes the sampling rate of the audio data.
    ///
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Audio tags)
    /// - video_file_format_spec_v10_1.pdf (Annex E.4.2.1 - AUDIODATA)
    pub enum SoundRate(u8) {
        /// 5.5 KHz
        Hz5500 = 0,
        /// 11 KHz
        Hz11000 = 1,
        /// 22 KHz
        Hz22000 = 2,
        /// 44 KHz
        Hz44000 = 3,
    }
}

impl SoundRate {
    /// Display name of the sound rate.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hz5500 => "5.5KHz",
            Self::Hz11000 => "11KHz",
            Self::Hz22000 => "22KHz",
            Self::Hz44000 => "44KHz",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV Sound Size
    ///
    /// Denotes the size of each sample in the audio data.
    ///
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Audio tags)
    /// - video_file_format_spec_v10_1.pdf (Annex E.4.2.1 - AUDIODATA)
    pub enum SoundSize(u8) {
        /// 8 bit
        Bit8 = 0,
        /// 16 bit
        Bit16 = 1,
    }
}

impl SoundSize {
    /// Display name of the sample size.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bit8 => "snd8Bit",
            Self::Bit16 => "snd16Bit",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV Sound Type
    ///
    /// Denotes the number of channels in the audio data.
    ///
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Audio tags)
    /// - video_file_format_spec_v10_1.pdf (Annex E.4.2.1 - AUDIODATA)
    pub enum SoundType(u8) {
        /// Mono
        Mono = 0,
        /// Stereo
        Stereo = 1,
    }
}

impl SoundType {
    /// Display name of the channel layout.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mono => "sndMono",
            Self::Stereo => "sndStereo",
            _ => "reserved",
        }
    }
}

nutype_enum! {
    /// FLV AAC Packet Type
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.2.2
    pub enum AacPacketType(u8) {
        /// Sequence Header
        SequenceHeader = 0,
        /// Raw
        Raw = 1,
    }
}

impl AacPacketType {
    /// Display name of the packet type.
    pub fn name(self) -> &'static str {
        match self {
            Self::SequenceHeader => "aac sequence header",
            Self::Raw => "aac raw",
            _ => "reserved",
        }
    }
}

/// The AAC extension of the audio tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AacPacketHeader {
    /// The AAC packet type.
    pub aac_packet_type: AacPacketType,
    /// The start of the `AudioSpecificConfig`, present on sequence headers.
    pub sequence_header: Option<AacSequenceHeader>,
}

/// The legacy FLV `AudioTagHeader`.
///
/// Only the header is interpreted. The audio frames that follow are skipped by
/// the demuxer.
///
/// Defined by video_file_format_spec_v10_1.pdf (Annex E.4.2.1 - AUDIODATA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioTagHeader {
    /// The sound format of the audio data. (4 bits)
    pub sound_format: SoundFormat,
    /// The sound rate of the audio data. (2 bits)
    pub sound_rate: SoundRate,
    /// The sound size of the audio data. (1 bit)
    pub sound_size: SoundSize,
    /// The sound type of the audio data. (1 bit)
    pub sound_type: SoundType,
    /// Present when `sound_format` is [`SoundFormat::Aac`].
    pub aac: Option<AacPacketHeader>,
}

impl AudioTagHeader {
    /// Demux the audio tag header from the given cursor.
    #[allow(clippy::unusual_byte_groupings)]
    pub fn demux(cursor: &mut ByteCursor<'_>) -> Result<Self, FlvError> {
        let byte = cursor.read_u8()?;

        // SoundFormat is the first 4 bits of the byte
        let sound_format = SoundFormat::from(byte >> 4); // 0b1111_00_0_0
        // SoundRate is the next 2 bits of the byte
        let sound_rate = SoundRate::from((byte & 0b0000_11_0_0) >> 2);
        // SoundSize is the next bit of the byte
        let sound_size = SoundSize::from((byte & 0b0000_00_1_0) >> 1);
        // SoundType is the last bit of the byte
        let sound_type = SoundType::from(byte & 0b0000_00_0_1);

        let aac = if sound_format == SoundFormat::Aac {
            let aac_packet_type = AacPacketType::from(cursor.read_u8()?);
            let sequence_header = if aac_packet_type == AacPacketType::SequenceHeader {
                Some(AacSequenceHeader::demux(cursor)?)
            } else {
                None
            };

            Some(AacPacketHeader {
                aac_packet_type,
                sequence_header,
            })
        } else {
            None
        };

        Ok(Self {
            sound_format,
            sound_rate,
            sound_size,
            sound_type,
            aac,
        })
    }
}

impl Describe for AudioTagHeader {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "audio tag header:")?;
        write_indent(out, level + 1)?;
        writeln!(out, "format: {}", self.sound_format.name())?;
        write_indent(out, level + 1)?;
        writeln!(out, "rate: {}", self.sound_rate.name())?;
        write_indent(out, level + 1)?;
        writeln!(out, "sound_size: {}", self.sound_size.name())?;
        write_indent(out, level + 1)?;
        writeln!(out, "sound_type: {}", self.sound_type.name())?;

        if let Some(aac) = &self.aac {
            write_indent(out, level + 1)?;
            writeln!(out, "packet_type: {}", aac.aac_packet_type.name())?;

            if let Some(config) = &aac.sequence_header {
                write_indent(out, level + 1)?;
                writeln!(out, "aac_object_type: {}", config.object_type.name())?;
                write_indent(out, level + 1)?;
                writeln!(out, "aac_sample_rate: {}", config.sampling_frequency_index.name())?;
                write_indent(out, level + 1)?;
                writeln!(out, "aac_channels: {}", config.channel_configuration)?;
            }
        }

        Ok(())
    }
}
