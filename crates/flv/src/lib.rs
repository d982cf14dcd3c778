//! A pure Rust, one-pass FLV demuxer.
//!
//! The demuxer walks the tags of an in-memory FLV file. Video and audio tags
//! have their headers interpreted (including the AVC packet header and the AAC
//! `AudioSpecificConfig` prefix), script data tags are decoded as AMF0 values,
//! and everything else is skipped.
//!
//! ## Example
//!
//! ```rust
//! use flvprobe_flv::{Describe, FlvTagPayload};
//!
//! # fn example(buf: &[u8]) -> Result<(), flvprobe_flv::error::FlvError> {
//! let demuxer = flvprobe_flv::parse(buf)?;
//! println!("{}", demuxer.header().describe());
//!
//! for tag in demuxer {
//!     let tag = tag?;
//!     if let FlvTagPayload::Script(script) = &tag.payload {
//!         println!("{:?}", script.on_meta_data());
//!     }
//! }
//! # Ok(())
//! # }
//! # example(b"FLV\x01\x05\x00\x00\x00\x09\x00\x00\x00\x00").unwrap();
//! ```
//!
//! ## Specifications
//!
//! | Name | Version | Link | Comments |
//! | --- | --- | --- | --- |
//! | Video File Format Specification | `10` | <https://github.com/veovera/enhanced-rtmp/blob/main/docs/legacy/video-file-format-v10-0-spec.pdf> | |
//! | Adobe Flash Video File Format Specification | `10.1` | <https://github.com/veovera/enhanced-rtmp/blob/main/docs/legacy/video-file-format-v10-1-spec.pdf> | Refered to as 'Legacy FLV spec' in this documentation |
//! | ISO/IEC 14496-3 | `2001` | | `AudioSpecificConfig` |
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

pub mod aac;
pub mod audio;
pub mod demuxer;
pub mod error;
pub mod header;
pub mod script;
pub mod tag;
pub mod video;

pub use demuxer::{FlvDemuxer, FlvDemuxerConfig};
pub use flvprobe_amf0::Describe;
pub use header::FlvHeader;
pub use tag::{FlvTag, FlvTagHeader, FlvTagPayload, FlvTagType};

/// Read the FLV header of `buf` and return a demuxer over its tags, using the
/// default configuration.
pub fn parse(buf: &[u8]) -> Result<FlvDemuxer<'_>, error::FlvError> {
    FlvDemuxer::new(buf)
}
