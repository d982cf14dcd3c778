//! An AMF0 value model with a symmetric encoder and decoder.
//!
//! Values are decoded from, and encoded into, the bounds-checked cursors of
//! `flvprobe-bytes-util`. Every value knows its exact encoded size up front
//! ([`Amf0Value::total_size`]), so encoding never reallocates.
//!
//! # Limitations
//!
//! - AMF0 references, long strings, XML documents and typed objects are
//!   recognized but rejected with [`Amf0Error::UnsupportedMarker`].
//! - Does not support the AVM+ Type Marker (AMF3).
//!
//! # Examples
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn std::error::Error>> {
//! use flvprobe_amf0::{Amf0Decoder, Amf0Object, Amf0Value};
//! use flvprobe_bytes_util::ByteCursor;
//!
//! let mut object = Amf0Object::new();
//! object.set("duration", 12.5);
//! object.set("encoder", "flvprobe");
//!
//! let value = Amf0Value::Object(object);
//! let bytes = value.to_vec()?;
//! assert_eq!(bytes.len(), value.total_size());
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! let decoded = Amf0Decoder::new(&mut cursor).decode_value()?;
//! assert_eq!(decoded, value);
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
//!
//! ## Feature flags
//!
//! - `serde`: implements `serde::Serialize` for [`Amf0Value`] and
//!   [`Amf0Object`] and `serde::Deserialize` for [`Amf0DecoderConfig`].
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

mod decoder;
mod describe;
mod encoder;
mod error;
mod object;
mod value;

pub use decoder::{Amf0Decoder, Amf0DecoderConfig, StringPolicy};
pub use describe::{Describe, write_indent};
pub use encoder::Amf0Encoder;
pub use error::Amf0Error;
pub use object::Amf0Object;
pub use value::{Amf0Date, Amf0EcmaArray, Amf0Value};

/// AMF0 marker types.
///
/// Defined by:
/// - AMF 0 spec, 2.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, num_derive::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker
    ///
    /// reserved, not supported
    MovieClip = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker
    ///
    /// reserved, not supported
    Recordset = 0x0e,
    /// xml-document-marker
    XmlDocument = 0x0f,
    /// typed-object-marker
    TypedObject = 0x10,
    /// avmplus-object-marker
    ///
    /// AMF3 marker
    AvmPlusObject = 0x11,
    /// Strict array marker used by some origin servers.
    OriginStrictArray = 0x20,
}

impl Amf0Marker {
    /// Returns `true` for markers this crate can decode and encode.
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Boolean
                | Self::String
                | Self::Object
                | Self::Null
                | Self::Undefined
                | Self::EcmaArray
                | Self::ObjectEnd
                | Self::StrictArray
                | Self::Date
        )
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use num_traits::FromPrimitive;

    use super::Amf0Marker;

    #[test]
    fn marker_table() {
        assert_eq!(Amf0Marker::from_u8(0x00), Some(Amf0Marker::Number));
        assert_eq!(Amf0Marker::from_u8(0x0b), Some(Amf0Marker::Date));
        assert_eq!(Amf0Marker::from_u8(0x11), Some(Amf0Marker::AvmPlusObject));
        assert_eq!(Amf0Marker::from_u8(0x20), Some(Amf0Marker::OriginStrictArray));
        assert_eq!(Amf0Marker::from_u8(0x12), None);
        assert_eq!(Amf0Marker::from_u8(0xff), None);
    }

    #[test]
    fn supported_markers() {
        let supported = (0u8..=0x20)
            .filter_map(Amf0Marker::from_u8)
            .filter(|m| m.is_supported())
            .count();
        assert_eq!(supported, 10);

        assert!(!Amf0Marker::Reference.is_supported());
        assert!(!Amf0Marker::OriginStrictArray.is_supported());
    }
}
