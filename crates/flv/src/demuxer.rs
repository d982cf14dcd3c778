//! One-pass FLV demuxing.

use std::iter::FusedIterator;

use flvprobe_amf0::Amf0DecoderConfig;
use flvprobe_bytes_util::ByteCursor;

use crate::audio::AudioTagHeader;
use crate::error::FlvError;
use crate::header::FlvHeader;
use crate::script::ScriptData;
use crate::tag::{FlvTag, FlvTagHeader, FlvTagPayload, FlvTagType};
use crate::video::VideoTagHeader;

/// Size of the previous tag size field in front of every tag.
const PREVIOUS_TAG_SIZE_SIZE: usize = 4;

/// Options for [`FlvDemuxer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct FlvDemuxerConfig {
    /// Options for decoding script data tags.
    pub amf0: Amf0DecoderConfig,
    /// Fail with [`FlvError::PreviousTagSizeMismatch`] when a previous tag size
    /// field disagrees with the tag before it. When disabled the mismatch is
    /// only logged.
    pub validate_previous_tag_size: bool,
}

/// A lazy, single pass iterator over the tags of an FLV buffer.
///
/// The header is read when the demuxer is created. Each call to
/// [`next`](Iterator::next) reads one previous tag size field and the tag
/// following it.
///
/// Errors inside a tag payload are returned for that tag only and iteration
/// continues with the next tag. Errors in the framing (a tag header cut off,
/// a payload larger than the rest of the buffer, or a rejected previous tag
/// size) end the iteration.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.3
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FlvDemuxer<'a> {
    cursor: ByteCursor<'a>,
    header: FlvHeader,
    config: FlvDemuxerConfig,
    expected_previous_tag_size: u32,
    done: bool,
}

impl<'a> FlvDemuxer<'a> {
    /// Create a demuxer with the default configuration.
    pub fn new(buf: &'a [u8]) -> Result<Self, FlvError> {
        Self::with_config(buf, FlvDemuxerConfig::default())
    }

    /// Create a demuxer, reading the FLV header from the start of `buf`.
    pub fn with_config(buf: &'a [u8], config: FlvDemuxerConfig) -> Result<Self, FlvError> {
        let mut cursor = ByteCursor::new(buf);
        let header = FlvHeader::demux(&mut cursor)?;

        tracing::debug!(
            version = header.version,
            has_audio = header.has_audio,
            has_video = header.has_video,
            data_offset = header.data_offset,
            "demuxed flv header"
        );

        Ok(Self {
            cursor,
            header,
            config,
            expected_previous_tag_size: 0,
            done: false,
        })
    }

    /// The FLV header.
    pub fn header(&self) -> &FlvHeader {
        &self.header
    }

    /// The configuration in use.
    pub fn config(&self) -> &FlvDemuxerConfig {
        &self.config
    }

    /// Offset of the next unread byte in the buffer.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Read the previous tag size and the tag header, and check the payload
    /// fits in the buffer. Any error here ends the iteration.
    fn demux_framing(&mut self) -> Result<(usize, u32, FlvTagHeader), FlvError> {
        let size_offset = self.cursor.offset();
        let previous_tag_size = self.cursor.read_u32()?;

        if previous_tag_size != self.expected_previous_tag_size {
            if self.config.validate_previous_tag_size {
                return Err(FlvError::PreviousTagSizeMismatch {
                    offset: size_offset,
                    expected: self.expected_previous_tag_size,
                    found: previous_tag_size,
                });
            }

            tracing::warn!(
                offset = size_offset,
                expected = self.expected_previous_tag_size,
                found = previous_tag_size,
                "previous tag size mismatch"
            );
        }

        let offset = self.cursor.offset();
        let header = FlvTagHeader::demux(&mut self.cursor)?;

        let data_size = header.data_size as usize;
        if data_size > self.cursor.remaining() {
            return Err(FlvError::Truncated {
                needed: data_size,
                available: self.cursor.remaining(),
            });
        }

        Ok((offset, previous_tag_size, header))
    }

    /// Interpret the payload. The cursor ends up `data_size` bytes past the
    /// tag header whatever happens here.
    fn demux_payload(&mut self, offset: usize, header: &FlvTagHeader) -> Result<FlvTagPayload, FlvError> {
        let mut payload = self.cursor.sub_cursor(header.data_size as usize)?;

        match header.tag_type {
            FlvTagType::Video => Ok(FlvTagPayload::Video(VideoTagHeader::demux(&mut payload)?)),
            FlvTagType::Audio => Ok(FlvTagPayload::Audio(AudioTagHeader::demux(&mut payload)?)),
            FlvTagType::ScriptData => match ScriptData::demux(&mut payload, self.config.amf0) {
                Ok(script) => Ok(FlvTagPayload::Script(script)),
                Err(source) => {
                    tracing::warn!(offset, error = %source, "failed to decode script data");
                    Err(FlvError::Script { offset, source })
                }
            },
            tag_type => {
                tracing::warn!(offset, tag_type = u8::from(tag_type), data_size = header.data_size, "skipping unknown tag type");
                Ok(FlvTagPayload::Unknown)
            }
        }
    }
}

impl Iterator for FlvDemuxer<'_> {
    type Item = Result<FlvTag, FlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        // a trailing previous tag size with nothing after it ends the file
        if self.done || self.cursor.remaining() <= PREVIOUS_TAG_SIZE_SIZE {
            self.done = true;
            return None;
        }

        let (offset, previous_tag_size, header) = match self.demux_framing() {
            Ok(framing) => framing,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        tracing::trace!(
            offset,
            tag_type = header.tag_type.name(),
            data_size = header.data_size,
            timestamp = header.timestamp_full(),
            "demuxing tag"
        );

        self.expected_previous_tag_size = header.tag_size();

        Some(self.demux_payload(offset, &header).map(|payload| FlvTag {
            offset,
            previous_tag_size,
            header,
            payload,
        }))
    }
}

impl FusedIterator for FlvDemuxer<'_> {}
