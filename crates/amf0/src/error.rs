//! AMF0 error type.

use flvprobe_bytes_util::CursorError;

use crate::Amf0Marker;

/// AMF0 error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Amf0Error {
    /// Not enough bytes left for the next fixed-size read or write.
    #[error("not enough bytes: needed {needed}, {available} remaining")]
    Truncated {
        /// Bytes the operation required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },
    /// Unknown marker.
    #[error("unknown marker: {0:#04x}")]
    UnknownMarker(u8),
    /// This marker is recognized but cannot be decoded or encoded.
    #[error("this marker is not supported: {0:?}")]
    UnsupportedMarker(Amf0Marker),
    /// A typed read found a different marker than it expects.
    #[error("unexpected marker: expected {expected:?}, found {found:?}")]
    MarkerMismatch {
        /// The marker the read expects.
        expected: Amf0Marker,
        /// The marker in the buffer.
        found: Amf0Marker,
    },
    /// An object end marker that is not the `00 00 09` sequence.
    #[error("malformed object end marker")]
    InvalidEofMarker,
    /// String bytes are not valid UTF-8.
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// String is too long to encode with a 16-bit length prefix.
    #[error("string is too long: {0} bytes")]
    StringTooLong(usize),
    /// Sequence has more elements than a 32-bit count can hold.
    #[error("too many elements: {0}")]
    TooManyElements(usize),
    /// Failure while processing the value of an object or ECMA array property.
    #[error("property '{name}': {source}")]
    Property {
        /// Name of the property.
        name: String,
        /// The underlying error.
        #[source]
        source: Box<Amf0Error>,
    },
    /// Failure while reading the name of an object or ECMA array property.
    #[error("name of property {index}: {source}")]
    PropertyName {
        /// Position of the property in its container.
        index: usize,
        /// The underlying error.
        #[source]
        source: Box<Amf0Error>,
    },
    /// Failure while processing an element of a strict array.
    #[error("element {index}: {source}")]
    Element {
        /// Position of the element.
        index: usize,
        /// The underlying error.
        #[source]
        source: Box<Amf0Error>,
    },
}

impl Amf0Error {
    /// Wrap this error with the name of the property being processed.
    pub fn in_property(self, name: impl Into<String>) -> Self {
        Self::Property {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Wrap this error with the position of the property whose name could not
    /// be read.
    pub fn in_property_name(self, index: usize) -> Self {
        Self::PropertyName {
            index,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the index of the array element being processed.
    pub fn in_element(self, index: usize) -> Self {
        Self::Element {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all property and element context removed.
    pub fn root_cause(&self) -> &Amf0Error {
        match self {
            Self::Property { source, .. } | Self::PropertyName { source, .. } | Self::Element { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<CursorError> for Amf0Error {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::InsufficientBytes { needed, available } => Self::Truncated { needed, available },
            CursorError::InvalidUtf8(err) => Self::InvalidUtf8(err),
        }
    }
}
