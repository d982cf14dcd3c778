//! AMF0 encoder

use flvprobe_bytes_util::ByteCursorMut;

use crate::{Amf0Date, Amf0EcmaArray, Amf0Error, Amf0Marker, Amf0Object, Amf0Value};

/// AMF0 encoder.
///
/// Provides various functions to encode different types of AMF0 values into a
/// fixed-size buffer. Size the buffer with [`Amf0Value::total_size`].
#[derive(Debug)]
pub struct Amf0Encoder<'c, 'a> {
    cursor: &'c mut ByteCursorMut<'a>,
}

impl<'c, 'a> Amf0Encoder<'c, 'a> {
    /// Create a new encoder writing at the position of `cursor`.
    pub fn new(cursor: &'c mut ByteCursorMut<'a>) -> Self {
        Amf0Encoder { cursor }
    }

    /// Encode any [`Amf0Value`].
    pub fn encode_value(&mut self, value: &Amf0Value) -> Result<(), Amf0Error> {
        match value {
            Amf0Value::Number(v) => self.encode_number(*v),
            Amf0Value::Boolean(v) => self.encode_boolean(*v),
            Amf0Value::String(v) => self.encode_string(v),
            Amf0Value::Object(v) => self.encode_object(v),
            Amf0Value::Null => self.encode_null(),
            Amf0Value::Undefined => self.encode_undefined(),
            Amf0Value::EcmaArray(v) => self.encode_ecma_array(v),
            Amf0Value::StrictArray(v) => self.encode_strict_array(v),
            Amf0Value::Date(v) => self.encode_date(*v),
            Amf0Value::ObjectEnd => self.encode_object_end(),
        }
    }

    fn encode_marker(&mut self, marker: Amf0Marker) -> Result<(), Amf0Error> {
        self.cursor.write_u8(marker as u8)?;
        Ok(())
    }

    /// Encode a [`bool`] as a AMF0 boolean value.
    pub fn encode_boolean(&mut self, value: bool) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Boolean)?;
        self.cursor.write_u8(value as u8)?;
        Ok(())
    }

    /// Encode a [`f64`] as a AMF0 number value.
    pub fn encode_number(&mut self, value: f64) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Number)?;
        self.cursor.write_f64(value)?;
        Ok(())
    }

    /// Write a length-prefixed string without a marker.
    fn encode_utf8(&mut self, value: &str) -> Result<(), Amf0Error> {
        let len = u16::try_from(value.len()).map_err(|_| Amf0Error::StringTooLong(value.len()))?;

        self.cursor.write_u16(len)?;
        self.cursor.write_bytes(value.as_bytes())?;
        Ok(())
    }

    /// Encode a [`&str`](str) as a AMF0 string value.
    pub fn encode_string(&mut self, value: &str) -> Result<(), Amf0Error> {
        // check before the marker so a failed write leaves nothing behind
        if value.len() > u16::MAX as usize {
            return Err(Amf0Error::StringTooLong(value.len()));
        }

        self.encode_marker(Amf0Marker::String)?;
        self.encode_utf8(value)
    }

    /// Encode AMF0 Null value.
    pub fn encode_null(&mut self) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Null)
    }

    /// Encode AMF0 Undefined value.
    pub fn encode_undefined(&mut self) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Undefined)
    }

    /// Encode an [`Amf0Date`].
    ///
    /// The milliseconds are written as a big-endian 64-bit integer and the
    /// time zone is always written as zero.
    pub fn encode_date(&mut self, value: Amf0Date) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Date)?;
        self.cursor.write_u64(value.millis as u64)?;
        self.cursor.write_i16(0)?;
        Ok(())
    }

    /// Encode the `00 00 09` object end sequence.
    pub fn encode_object_end(&mut self) -> Result<(), Amf0Error> {
        self.cursor.write_u24(Amf0Marker::ObjectEnd as u32)?;
        Ok(())
    }

    fn encode_properties(&mut self, properties: &Amf0Object) -> Result<(), Amf0Error> {
        for (key, value) in properties.iter() {
            self.encode_utf8(key)
                .and_then(|()| self.encode_value(value))
                .map_err(|err| err.in_property(key))?;
        }

        self.encode_object_end()
    }

    /// Encode an [`Amf0Object`] as an AMF0 Object value.
    pub fn encode_object(&mut self, values: &Amf0Object) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::Object)?;
        self.encode_properties(values)
    }

    /// Encode an [`Amf0EcmaArray`] with its stored declared count.
    pub fn encode_ecma_array(&mut self, array: &Amf0EcmaArray) -> Result<(), Amf0Error> {
        self.encode_marker(Amf0Marker::EcmaArray)?;
        self.cursor.write_u32(array.declared_count)?;
        self.encode_properties(&array.properties)
    }

    /// Encode a slice of values as an AMF0 StrictArray value.
    pub fn encode_strict_array(&mut self, values: &[Amf0Value]) -> Result<(), Amf0Error> {
        let len = u32::try_from(values.len()).map_err(|_| Amf0Error::TooManyElements(values.len()))?;

        self.encode_marker(Amf0Marker::StrictArray)?;
        self.cursor.write_u32(len)?;

        for (index, value) in values.iter().enumerate() {
            self.encode_value(value).map_err(|err| err.in_element(index))?;
        }

        Ok(())
    }
}
