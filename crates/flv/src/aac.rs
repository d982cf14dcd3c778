//! AAC `AudioSpecificConfig` prefix carried by AAC sequence headers.

use flvprobe_bytes_util::ByteCursor;
use nutype_enum::nutype_enum;

use crate::error::FlvError;

nutype_enum! {
    /// MPEG-4 Audio Object Type
    ///
    /// Defined by:
    /// - ISO/IEC 14496-3:2001, Table 1.1 - Audio Object Type definition
    pub enum AudioObjectType(u8) {
        /// Null / forbidden
        Null = 0,
        /// AAC Main
        AacMain = 1,
        /// AAC LC (Low Complexity)
        AacLowComplexity = 2,
        /// AAC SSR (Scalable Sample Rate)
        AacScalableSampleRate = 3,
        /// HE-AAC (LC + SBR)
        AacHighEfficiency = 5,
        /// HE-AAC v2 (LC + SBR + PS)
        AacHighEfficiencyV2 = 29,
    }
}

impl AudioObjectType {
    /// Display name of the object type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "AacObjectTypeForbidden",
            Self::AacMain => "AacObjectTypeAacMain",
            Self::AacLowComplexity => "AacObjectTypeAacLC",
            Self::AacScalableSampleRate => "AacObjectTypeAacSSR",
            Self::AacHighEfficiency => "AacObjectTypeAacHE",
            Self::AacHighEfficiencyV2 => "AacObjectTypeAacHEV2",
            _ => "AacObjectTypeReserved",
        }
    }
}

nutype_enum! {
    /// MPEG-4 Sampling Frequency Index
    ///
    /// Defined by:
    /// - ISO/IEC 14496-3:2001, 1.6.3.4 samplingFrequencyIndex
    pub enum SamplingFrequencyIndex(u8) {
        /// 96000 Hz
        Hz96000 = 0x0,
        /// 88200 Hz
        Hz88200 = 0x1,
        /// 64000 Hz
        Hz64000 = 0x2,
        /// 48000 Hz
        Hz48000 = 0x3,
        /// 44100 Hz
        Hz44100 = 0x4,
        /// 32000 Hz
        Hz32000 = 0x5,
        /// 24000 Hz
        Hz24000 = 0x6,
        /// 22050 Hz
        Hz22050 = 0x7,
        /// 16000 Hz
        Hz16000 = 0x8,
        /// 12000 Hz
        Hz12000 = 0x9,
        /// 11025 Hz
        Hz11025 = 0xa,
        /// 8000 Hz
        Hz8000 = 0xb,
        /// 7350 Hz
        Hz7350 = 0xc,
        /// Reserved
        Reserved0xd = 0xd,
        /// Reserved
        Reserved0xe = 0xe,
        /// The frequency is written explicitly after the index
        Escape = 0xf,
    }
}

impl SamplingFrequencyIndex {
    /// The sampling frequency in Hz, for the indices that name one.
    pub fn to_freq(self) -> Option<u32> {
        match self {
            Self::Hz96000 => Some(96000),
            Self::Hz88200 => Some(88200),
            Self::Hz64000 => Some(64000),
            Self::Hz48000 => Some(48000),
            Self::Hz44100 => Some(44100),
            Self::Hz32000 => Some(32000),
            Self::Hz24000 => Some(24000),
            Self::Hz22050 => Some(22050),
            Self::Hz16000 => Some(16000),
            Self::Hz12000 => Some(12000),
            Self::Hz11025 => Some(11025),
            Self::Hz8000 => Some(8000),
            Self::Hz7350 => Some(7350),
            _ => None,
        }
    }

    /// Display name of the index.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hz96000 => "SampleRate96000",
            Self::Hz88200 => "SampleRate88200",
            Self::Hz64000 => "SampleRate64000",
            Self::Hz48000 => "SampleRate48000",
            Self::Hz44100 => "SampleRate44100",
            Self::Hz32000 => "SampleRate32000",
            Self::Hz24000 => "SampleRate24000",
            Self::Hz22050 => "SampleRate22050",
            Self::Hz16000 => "SampleRate16000",
            Self::Hz12000 => "SampleRate12000",
            Self::Hz11025 => "SampleRate11025",
            Self::Hz8000 => "SampleRate8000",
            Self::Hz7350 => "SampleRate7350",
            Self::Escape => "SampleRateEscapeValue_0xf",
            _ => "SampleRateReserved",
        }
    }
}

/// The first two bytes of an `AudioSpecificConfig`.
///
/// Only the fixed prefix is read. An escaped sampling frequency
/// ([`SamplingFrequencyIndex::Escape`]) is reported as is, the explicit 24-bit
/// frequency after it is not parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AacSequenceHeader {
    /// The audio object type. (5 bits)
    pub object_type: AudioObjectType,
    /// The sampling frequency index. (4 bits, spanning the byte boundary)
    pub sampling_frequency_index: SamplingFrequencyIndex,
    /// The channel configuration. (4 bits)
    pub channel_configuration: u8,
}

impl AacSequenceHeader {
    /// Demux the two-byte prefix from the given cursor.
    #[allow(clippy::unusual_byte_groupings)]
    pub fn demux(cursor: &mut ByteCursor<'_>) -> Result<Self, FlvError> {
        let first = cursor.read_u8()?;
        let second = cursor.read_u8()?;

        // ooooo_fff f_cccc_xxx
        let object_type = AudioObjectType::from((first >> 3) & 0b000_11111);
        let sampling_frequency_index = SamplingFrequencyIndex::from(((first << 1) & 0b0000_1110) | ((second >> 7) & 0b1));
        let channel_configuration = (second >> 3) & 0b0000_1111;

        Ok(Self {
            object_type,
            sampling_frequency_index,
            channel_configuration,
        })
    }

    /// The sampling frequency in Hz, if the index names one.
    pub fn sampling_frequency(&self) -> Option<u32> {
        self.sampling_frequency_index.to_freq()
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn bit_layout() {
        let cases = [
            // LC, 44100, stereo
            ([0x12, 0x10], AudioObjectType::AacLowComplexity, SamplingFrequencyIndex::Hz44100, 2),
            // LC, 48000, stereo
            ([0x11, 0x90], AudioObjectType::AacLowComplexity, SamplingFrequencyIndex::Hz48000, 2),
            // HE, 22050, mono
            ([0x2B, 0x88], AudioObjectType::AacHighEfficiency, SamplingFrequencyIndex::Hz22050, 1),
            // Main, 7350, 5.1
            ([0x0E, 0x30], AudioObjectType::AacMain, SamplingFrequencyIndex::Hz7350, 6),
        ];

        for (bytes, object_type, index, channels) in cases {
            let config = AacSequenceHeader::demux(&mut ByteCursor::new(&bytes)).unwrap();
            assert_eq!(config.object_type, object_type, "{bytes:02x?}");
            assert_eq!(config.sampling_frequency_index, index, "{bytes:02x?}");
            assert_eq!(config.channel_configuration, channels, "{bytes:02x?}");
        }
    }

    #[test]
    fn frequencies() {
        let expected = [
            96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
        ];

        for (index, freq) in expected.into_iter().enumerate() {
            assert_eq!(SamplingFrequencyIndex::from(index as u8).to_freq(), Some(freq));
        }

        assert_eq!(SamplingFrequencyIndex::Reserved0xd.to_freq(), None);
        assert_eq!(SamplingFrequencyIndex::Escape.to_freq(), None);
    }

    #[test]
    fn names() {
        assert_eq!(AudioObjectType::AacHighEfficiencyV2.name(), "AacObjectTypeAacHEV2");
        assert_eq!(AudioObjectType::from(4).name(), "AacObjectTypeReserved");
        assert_eq!(SamplingFrequencyIndex::Hz64000.name(), "SampleRate64000");
        assert_eq!(SamplingFrequencyIndex::from(0xe).name(), "SampleRateReserved");
    }
}
