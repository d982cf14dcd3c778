//! AMF0 value types.

use flvprobe_bytes_util::ByteCursorMut;

use crate::{Amf0Encoder, Amf0Error, Amf0Marker, Amf0Object};

/// Size of the `00 00 09` object end sequence.
pub(crate) const OBJECT_END_SIZE: usize = 3;

/// AMF0 Date.
///
/// The time zone is kept when decoding but always encoded as zero, as
/// required by AMF 0 spec, 2.13.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Amf0Date {
    /// Milliseconds since the Unix epoch.
    pub millis: i64,
    /// Time zone offset in minutes, as found on the wire.
    pub time_zone: i16,
}

impl Amf0Date {
    /// Create a date with a zero time zone.
    pub fn new(millis: i64) -> Self {
        Self { millis, time_zone: 0 }
    }
}

/// AMF0 ECMA array.
///
/// Behaves like an [`Amf0Object`] on the wire but carries a declared element
/// count. The count is informational: decoding stops at the object end marker
/// whatever the count says, and encoding writes the stored count unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amf0EcmaArray {
    /// The element count written before the properties.
    pub declared_count: u32,
    /// The array properties.
    pub properties: Amf0Object,
}

impl Amf0EcmaArray {
    /// Create an ECMA array whose declared count matches its properties.
    pub fn from_properties(properties: Amf0Object) -> Self {
        Self {
            declared_count: u32::try_from(properties.len()).unwrap_or(u32::MAX),
            properties,
        }
    }
}

/// Represents any AMF0 value.
#[derive(Debug, PartialEq, Clone)]
pub enum Amf0Value {
    /// AMF0 Number.
    Number(f64),
    /// AMF0 Boolean.
    Boolean(bool),
    /// AMF0 String.
    String(String),
    /// AMF0 Object.
    Object(Amf0Object),
    /// AMF0 Null.
    Null,
    /// AMF0 Undefined.
    Undefined,
    /// AMF0 ECMA array.
    EcmaArray(Amf0EcmaArray),
    /// AMF0 Strict array.
    StrictArray(Vec<Amf0Value>),
    /// AMF0 Date.
    Date(Amf0Date),
    /// The object end sentinel.
    ///
    /// Only produced when a bare `00 00 09` sequence is decoded as a value.
    /// Objects and ECMA arrays never store it as a property.
    ObjectEnd,
}

impl Amf0Value {
    /// The marker this value is encoded with.
    pub fn marker(&self) -> Amf0Marker {
        match self {
            Self::Number(_) => Amf0Marker::Number,
            Self::Boolean(_) => Amf0Marker::Boolean,
            Self::String(_) => Amf0Marker::String,
            Self::Object(_) => Amf0Marker::Object,
            Self::Null => Amf0Marker::Null,
            Self::Undefined => Amf0Marker::Undefined,
            Self::EcmaArray(_) => Amf0Marker::EcmaArray,
            Self::StrictArray(_) => Amf0Marker::StrictArray,
            Self::Date(_) => Amf0Marker::Date,
            Self::ObjectEnd => Amf0Marker::ObjectEnd,
        }
    }

    /// Returns `true` for containers and the object end sentinel.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Self::Object(_) | Self::EcmaArray(_) | Self::StrictArray(_) | Self::ObjectEnd
        )
    }

    /// The string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The date, if this is a date value.
    pub fn as_date(&self) -> Option<Amf0Date> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// The properties, if this is an object.
    pub fn as_object(&self) -> Option<&Amf0Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The array, if this is an ECMA array.
    pub fn as_ecma_array(&self) -> Option<&Amf0EcmaArray> {
        match self {
            Self::EcmaArray(a) => Some(a),
            _ => None,
        }
    }

    /// The elements, if this is a strict array.
    pub fn as_strict_array(&self) -> Option<&[Amf0Value]> {
        match self {
            Self::StrictArray(a) => Some(a),
            _ => None,
        }
    }

    /// The properties of an object or ECMA array.
    pub fn properties(&self) -> Option<&Amf0Object> {
        match self {
            Self::Object(o) => Some(o),
            Self::EcmaArray(a) => Some(&a.properties),
            _ => None,
        }
    }

    /// The exact number of bytes [`encode`](Self::encode) writes for this value.
    pub fn total_size(&self) -> usize {
        fn properties_size(properties: &Amf0Object) -> usize {
            properties
                .iter()
                .map(|(key, value)| utf8_size(key) + value.total_size())
                .sum::<usize>()
                + OBJECT_END_SIZE
        }

        match self {
            Self::Number(_) => 1 + 8,
            Self::Boolean(_) => 1 + 1,
            Self::String(s) => 1 + utf8_size(s),
            Self::Object(o) => 1 + properties_size(o),
            Self::Null | Self::Undefined => 1,
            Self::EcmaArray(a) => 1 + 4 + properties_size(&a.properties),
            Self::StrictArray(a) => 1 + 4 + a.iter().map(Self::total_size).sum::<usize>(),
            Self::Date(_) => 1 + 8 + 2,
            Self::ObjectEnd => OBJECT_END_SIZE,
        }
    }

    /// Encode this value at the position of `cursor`.
    pub fn encode(&self, cursor: &mut ByteCursorMut<'_>) -> Result<(), Amf0Error> {
        Amf0Encoder::new(cursor).encode_value(self)
    }

    /// Encode this value into a new vector of exactly [`total_size`](Self::total_size) bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, Amf0Error> {
        let mut buf = vec![0; self.total_size()];
        self.encode(&mut ByteCursorMut::new(&mut buf))?;
        Ok(buf)
    }

    /// Encode this value into a new [`Bytes`](bytes::Bytes) buffer.
    pub fn to_bytes(&self) -> Result<bytes::Bytes, Amf0Error> {
        self.to_vec().map(bytes::Bytes::from)
    }
}

/// Size of a length-prefixed string without a marker.
pub(crate) fn utf8_size(s: &str) -> usize {
    2 + s.len()
}

impl From<f64> for Amf0Value {
    fn from(value: f64) -> Self {
        Amf0Value::Number(value)
    }
}

impl From<bool> for Amf0Value {
    fn from(value: bool) -> Self {
        Amf0Value::Boolean(value)
    }
}

impl From<String> for Amf0Value {
    fn from(value: String) -> Self {
        Amf0Value::String(value)
    }
}

impl From<&str> for Amf0Value {
    fn from(value: &str) -> Self {
        Amf0Value::String(value.to_owned())
    }
}

impl From<Amf0Object> for Amf0Value {
    fn from(value: Amf0Object) -> Self {
        Amf0Value::Object(value)
    }
}

impl From<Amf0EcmaArray> for Amf0Value {
    fn from(value: Amf0EcmaArray) -> Self {
        Amf0Value::EcmaArray(value)
    }
}

impl From<Vec<Amf0Value>> for Amf0Value {
    fn from(value: Vec<Amf0Value>) -> Self {
        Amf0Value::StrictArray(value)
    }
}

impl From<Amf0Date> for Amf0Value {
    fn from(value: Amf0Date) -> Self {
        Amf0Value::Date(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Amf0Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        match self {
            Amf0Value::Number(v) => serializer.serialize_f64(*v),
            Amf0Value::Boolean(v) => serializer.serialize_bool(*v),
            Amf0Value::String(v) => serializer.serialize_str(v),
            Amf0Value::Object(v) => serde::Serialize::serialize(v, serializer),
            Amf0Value::EcmaArray(v) => serde::Serialize::serialize(&v.properties, serializer),
            Amf0Value::StrictArray(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;

                for value in v {
                    seq.serialize_element(value)?;
                }

                seq.end()
            }
            Amf0Value::Date(v) => serializer.serialize_i64(v.millis),
            Amf0Value::Null | Amf0Value::Undefined | Amf0Value::ObjectEnd => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use flvprobe_bytes_util::ByteCursor;

    use super::*;
    use crate::Amf0Decoder;

    fn sample_values() -> Vec<Amf0Value> {
        let mut meta = Amf0Object::new();
        meta.set("duration", 30.0);
        meta.set("hasVideo", true);
        meta.set("encoder", "Lavf58.29.100");

        let mut nested = Amf0Object::new();
        nested.set("meta", meta.clone());
        nested.set("missing", Amf0Value::Null);

        vec![
            Amf0Value::Number(-1.5),
            Amf0Value::Boolean(true),
            Amf0Value::Boolean(false),
            Amf0Value::String(String::new()),
            Amf0Value::String("onMetaData".to_owned()),
            Amf0Value::Object(Amf0Object::new()),
            Amf0Value::Object(nested),
            Amf0Value::Null,
            Amf0Value::Undefined,
            Amf0Value::EcmaArray(Amf0EcmaArray::from_properties(meta)),
            Amf0Value::StrictArray(vec![1.0.into(), "two".into(), Amf0Value::StrictArray(vec![])]),
            Amf0Value::Date(Amf0Date::new(1_600_000_000_000)),
            Amf0Value::ObjectEnd,
        ]
    }

    #[test]
    fn encode_decode_every_variant() {
        for value in sample_values() {
            let bytes = value.to_vec().unwrap();
            assert_eq!(bytes.len(), value.total_size(), "size of {value:?}");
            assert_eq!(bytes[0] == value.marker() as u8, value != Amf0Value::ObjectEnd);

            let mut cursor = ByteCursor::new(&bytes);
            let decoded = Amf0Decoder::new(&mut cursor).decode_value().unwrap();
            assert_eq!(decoded, value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn date_millis_are_exact() {
        let cases = [(1i64 << 53) + 1, i64::MAX - 1, i64::MIN, -1, 0];

        for millis in cases {
            let value = Amf0Value::Date(Amf0Date::new(millis));
            let bytes = value.to_vec().unwrap();
            assert_eq!(&bytes[1..9], &millis.to_be_bytes(), "{millis}");

            let mut cursor = ByteCursor::new(&bytes);
            let decoded = Amf0Decoder::new(&mut cursor).decode_value().unwrap();
            assert_eq!(decoded.as_date().map(|date| date.millis), Some(millis));
        }
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(Amf0Value::Number(0.0).total_size(), 9);
        assert_eq!(Amf0Value::Boolean(true).total_size(), 2);
        assert_eq!(Amf0Value::Null.total_size(), 1);
        assert_eq!(Amf0Value::Undefined.total_size(), 1);
        assert_eq!(Amf0Value::Date(Amf0Date::default()).total_size(), 11);
        assert_eq!(Amf0Value::ObjectEnd.total_size(), 3);
        assert_eq!(Amf0Value::from("abc").total_size(), 6);
        assert_eq!(Amf0Value::Object(Amf0Object::new()).total_size(), 4);
        assert_eq!(Amf0Value::EcmaArray(Amf0EcmaArray::default()).total_size(), 8);
        assert_eq!(Amf0Value::StrictArray(vec![]).total_size(), 5);
    }

    #[test]
    fn to_bytes_matches_to_vec() {
        let value = Amf0Value::from("hello");
        assert_eq!(value.to_bytes().unwrap().as_ref(), value.to_vec().unwrap().as_slice());
    }

    #[test]
    fn deep_copy() {
        let mut object = Amf0Object::new();
        object.set("list", Amf0Value::StrictArray(vec![1.0.into()]));
        let source = Amf0Value::Object(object);

        let mut copy = source.clone();
        if let Amf0Value::Object(o) = &mut copy {
            if let Some(Amf0Value::StrictArray(list)) = o.get_mut("list") {
                list.push(2.0.into());
            }
            o.set("extra", Amf0Value::Undefined);
        }

        let original = source.as_object().unwrap();
        assert_eq!(original.len(), 1);
        assert_eq!(original.get("list").and_then(Amf0Value::as_strict_array).map(<[_]>::len), Some(1));
        assert_eq!(copy.properties().map(Amf0Object::len), Some(2));
    }

    #[test]
    fn accessors() {
        assert_eq!(Amf0Value::from(2.0).as_number(), Some(2.0));
        assert_eq!(Amf0Value::from(true).as_str(), None);
        assert_eq!(Amf0Value::from(Amf0Date::new(5)).as_date(), Some(Amf0Date::new(5)));
        assert!(Amf0Value::StrictArray(vec![]).is_complex());
        assert!(Amf0Value::ObjectEnd.is_complex());
        assert!(!Amf0Value::Null.is_complex());
        assert_eq!(Amf0Value::Null.properties(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_json() {
        let mut object = Amf0Object::new();
        object.set("width", 640.0);
        object.set("tags", Amf0Value::StrictArray(vec!["a".into(), Amf0Value::Null]));

        let json = serde_json::to_string(&Amf0Value::Object(object)).unwrap();
        assert_eq!(json, r#"{"width":640.0,"tags":["a",null]}"#);
    }
}
