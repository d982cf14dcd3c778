//! AMF0 decoder

use flvprobe_bytes_util::ByteCursor;
use num_traits::FromPrimitive;

use crate::value::OBJECT_END_SIZE;
use crate::{Amf0Date, Amf0EcmaArray, Amf0Error, Amf0Marker, Amf0Object, Amf0Value};

/// The `00 00 09` sequence that terminates objects and ECMA arrays.
const OBJECT_END: u32 = Amf0Marker::ObjectEnd as u32;

/// How string bytes that are not valid UTF-8 are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum StringPolicy {
    /// Fail with [`Amf0Error::InvalidUtf8`].
    #[default]
    Strict,
    /// Replace invalid sequences with `U+FFFD`.
    Lossy,
}

/// Decoder options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Amf0DecoderConfig {
    /// Handling of invalid UTF-8 in strings and property names.
    pub string_policy: StringPolicy,
}

/// AMF0 decoder.
///
/// Reads values from a borrowed [`ByteCursor`]. The decoder keeps no state of
/// its own besides its configuration, so it can be created on the fly for
/// every value.
#[derive(Debug)]
pub struct Amf0Decoder<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    config: Amf0DecoderConfig,
}

impl<'c, 'a> Amf0Decoder<'c, 'a> {
    /// Create a new decoder with the default configuration.
    pub fn new(cursor: &'c mut ByteCursor<'a>) -> Self {
        Self::with_config(cursor, Amf0DecoderConfig::default())
    }

    /// Create a new decoder.
    pub fn with_config(cursor: &'c mut ByteCursor<'a>, config: Amf0DecoderConfig) -> Self {
        Self { cursor, config }
    }

    /// Check if there are remaining bytes to read.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        !self.cursor.is_empty()
    }

    /// Determine the marker of the next value without consuming anything.
    ///
    /// A `00 00 09` sequence is reported as [`Amf0Marker::ObjectEnd`] before
    /// the first byte is looked up on its own.
    pub fn discover(&mut self) -> Result<Amf0Marker, Amf0Error> {
        if self.is_object_end() {
            return Ok(Amf0Marker::ObjectEnd);
        }

        let byte = self.cursor.read_u8()?;
        self.cursor.skip(-1);

        Amf0Marker::from_u8(byte).ok_or(Amf0Error::UnknownMarker(byte))
    }

    fn is_object_end(&mut self) -> bool {
        if !self.cursor.has_at_least(OBJECT_END_SIZE) {
            return false;
        }

        match self.cursor.read_u24() {
            Ok(bytes) => {
                self.cursor.skip(-(OBJECT_END_SIZE as isize));
                bytes == OBJECT_END
            }
            Err(_) => false,
        }
    }

    /// Decode a [`Amf0Value`] from the buffer.
    pub fn decode_value(&mut self) -> Result<Amf0Value, Amf0Error> {
        let marker = self.discover()?;

        match marker {
            Amf0Marker::Number => self.decode_number().map(Amf0Value::Number),
            Amf0Marker::Boolean => self.decode_boolean().map(Amf0Value::Boolean),
            Amf0Marker::String => self.decode_string().map(Amf0Value::String),
            Amf0Marker::Object => self.decode_object().map(Amf0Value::Object),
            Amf0Marker::Null => self.decode_null().map(|()| Amf0Value::Null),
            Amf0Marker::Undefined => self.decode_undefined().map(|()| Amf0Value::Undefined),
            Amf0Marker::EcmaArray => self.decode_ecma_array().map(Amf0Value::EcmaArray),
            Amf0Marker::ObjectEnd => self.decode_object_end().map(|()| Amf0Value::ObjectEnd),
            Amf0Marker::StrictArray => self.decode_strict_array().map(Amf0Value::StrictArray),
            Amf0Marker::Date => self.decode_date().map(Amf0Value::Date),
            _ => Err(Amf0Error::UnsupportedMarker(marker)),
        }
    }

    /// Decode all values from the buffer until the end.
    pub fn decode_all(&mut self) -> Result<Vec<Amf0Value>, Amf0Error> {
        let mut values = Vec::new();

        while self.has_remaining() {
            let value = self.decode_value()?;
            values.push(value);
        }

        Ok(values)
    }

    fn expect_marker(&mut self, expected: Amf0Marker) -> Result<(), Amf0Error> {
        let byte = self.cursor.read_u8()?;
        let found = Amf0Marker::from_u8(byte).ok_or(Amf0Error::UnknownMarker(byte))?;

        if found != expected {
            return Err(Amf0Error::MarkerMismatch { expected, found });
        }

        Ok(())
    }

    /// Decode a number from the buffer.
    pub fn decode_number(&mut self) -> Result<f64, Amf0Error> {
        self.expect_marker(Amf0Marker::Number)?;
        Ok(self.cursor.read_f64()?)
    }

    /// Decode a boolean from the buffer.
    pub fn decode_boolean(&mut self) -> Result<bool, Amf0Error> {
        self.expect_marker(Amf0Marker::Boolean)?;
        Ok(self.cursor.read_u8()? != 0)
    }

    /// Read a length-prefixed string without a marker.
    ///
    /// Object keys are encoded this way.
    fn decode_utf8(&mut self) -> Result<String, Amf0Error> {
        let len = self.cursor.read_u16()? as usize;

        let value = match self.config.string_policy {
            StringPolicy::Strict => self.cursor.read_string(len)?,
            StringPolicy::Lossy => self.cursor.read_string_lossy(len)?,
        };

        Ok(value)
    }

    /// Decode a string from the buffer.
    pub fn decode_string(&mut self) -> Result<String, Amf0Error> {
        self.expect_marker(Amf0Marker::String)?;
        self.decode_utf8()
    }

    /// Decode a null value from the buffer.
    pub fn decode_null(&mut self) -> Result<(), Amf0Error> {
        self.expect_marker(Amf0Marker::Null)
    }

    /// Decode an undefined value from the buffer.
    pub fn decode_undefined(&mut self) -> Result<(), Amf0Error> {
        self.expect_marker(Amf0Marker::Undefined)
    }

    /// Decode a date from the buffer.
    ///
    /// The milliseconds are a big-endian 64-bit integer.
    pub fn decode_date(&mut self) -> Result<Amf0Date, Amf0Error> {
        self.expect_marker(Amf0Marker::Date)?;

        let millis = self.cursor.read_u64()? as i64;
        let time_zone = self.cursor.read_i16()?;

        Ok(Amf0Date { millis, time_zone })
    }

    /// Consume an object end sequence.
    pub fn decode_object_end(&mut self) -> Result<(), Amf0Error> {
        if self.cursor.read_u24()? != OBJECT_END {
            return Err(Amf0Error::InvalidEofMarker);
        }

        Ok(())
    }

    /// Read `(name, value)` pairs up to and including the object end sequence.
    fn decode_properties(&mut self, mut properties: Amf0Object) -> Result<Amf0Object, Amf0Error> {
        let mut index = 0;

        while !self.is_object_end() {
            let name = self.decode_utf8().map_err(|err| err.in_property_name(index))?;
            let value = match self.decode_value() {
                Ok(value) => value,
                Err(err) => return Err(err.in_property(name)),
            };

            properties.set(name, value);
            index += 1;
        }

        self.decode_object_end()?;

        Ok(properties)
    }

    /// Decode an object from the buffer.
    pub fn decode_object(&mut self) -> Result<Amf0Object, Amf0Error> {
        self.expect_marker(Amf0Marker::Object)?;
        self.decode_properties(Amf0Object::new())
    }

    /// Decode an ECMA array from the buffer.
    ///
    /// The declared count is kept but does not limit how many properties are
    /// read.
    pub fn decode_ecma_array(&mut self) -> Result<Amf0EcmaArray, Amf0Error> {
        self.expect_marker(Amf0Marker::EcmaArray)?;

        let declared_count = self.cursor.read_u32()?;
        let capacity = (declared_count as usize).min(self.cursor.remaining() / OBJECT_END_SIZE);
        let properties = self.decode_properties(Amf0Object::with_capacity(capacity))?;

        Ok(Amf0EcmaArray {
            declared_count,
            properties,
        })
    }

    /// Decode a strict array from the buffer.
    pub fn decode_strict_array(&mut self) -> Result<Vec<Amf0Value>, Amf0Error> {
        self.expect_marker(Amf0Marker::StrictArray)?;

        let count = self.cursor.read_u32()? as usize;
        // every element takes at least one byte
        let mut array = Vec::with_capacity(count.min(self.cursor.remaining()));

        for index in 0..count {
            let value = self.decode_value().map_err(|err| err.in_element(index))?;
            array.push(value);
        }

        Ok(array)
    }
}
