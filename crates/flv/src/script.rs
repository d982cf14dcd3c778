//! Script data structures

use std::fmt;

use flvprobe_amf0::{Amf0Decoder, Amf0DecoderConfig, Amf0Error, Amf0Object, Amf0Value, Describe, write_indent};
use flvprobe_bytes_util::ByteCursor;

/// Name of the script data carrying stream metadata.
pub const ON_META_DATA: &str = "onMetaData";

/// FLV `SCRIPTDATA` tag
///
/// The payload is a sequence of AMF0 values. By convention it is a string
/// naming the data followed by its value, for example `"onMetaData"` followed
/// by an ECMA array. The values are kept as decoded and not interpreted.
///
/// Defined by:
/// - Legacy FLV spec, Annex E.4.4.1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptData {
    /// The decoded values in payload order.
    pub values: Vec<Amf0Value>,
}

impl ScriptData {
    /// Decode every AMF0 value in the cursor.
    ///
    /// The cursor should be limited to the tag payload, decoding runs until it
    /// is empty.
    pub fn demux(cursor: &mut ByteCursor<'_>, config: Amf0DecoderConfig) -> Result<Self, Amf0Error> {
        let values = Amf0Decoder::with_config(cursor, config).decode_all()?;
        Ok(Self { values })
    }

    /// The leading string value, usually the name of the script data.
    pub fn name(&self) -> Option<&str> {
        self.values.first()?.as_str()
    }

    /// The values paired as `(name, value)`, skipping pairs that do not start
    /// with a string.
    pub fn named_values(&self) -> impl Iterator<Item = (&str, &Amf0Value)> {
        self.values.chunks(2).filter_map(|pair| match pair {
            [Amf0Value::String(name), value] => Some((name.as_str(), value)),
            _ => None,
        })
    }

    /// The properties of the `onMetaData` value, if present.
    ///
    /// Encoders write them either as an ECMA array or as an object.
    pub fn on_meta_data(&self) -> Option<&Amf0Object> {
        self.named_values()
            .find(|(name, _)| *name == ON_META_DATA)
            .and_then(|(_, value)| value.properties())
    }
}

impl Describe for ScriptData {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        writeln!(out, "script data ({} values):", self.values.len())?;

        for value in &self.values {
            write_indent(out, level + 1)?;
            out.write_str("Value ")?;

            if value.is_complex() {
                value.describe_to(out, level + 1)?;
            } else {
                value.describe_to(out, 0)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use flvprobe_amf0::{Amf0EcmaArray, Amf0Marker};

    use super::*;

    fn on_meta_data_bytes() -> Vec<u8> {
        let mut meta = Amf0Object::new();
        meta.set("duration", 10.0);
        meta.set("width", 640.0);
        meta.set("stereo", true);

        let mut bytes = Amf0Value::from(ON_META_DATA).to_vec().unwrap();
        bytes.extend(Amf0Value::EcmaArray(Amf0EcmaArray::from_properties(meta)).to_vec().unwrap());
        bytes
    }

    #[test]
    fn on_meta_data() {
        let bytes = on_meta_data_bytes();
        let mut cursor = ByteCursor::new(&bytes);

        let script = ScriptData::demux(&mut cursor, Amf0DecoderConfig::default()).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(script.values.len(), 2);
        assert_eq!(script.name(), Some(ON_META_DATA));

        let meta = script.on_meta_data().unwrap();
        assert_eq!(meta.get_number("duration"), Some(10.0));
        assert_eq!(meta.get_number("width"), Some(640.0));
        assert_eq!(meta.get_boolean("stereo"), Some(true));
    }

    #[test]
    fn named_values_skip_unnamed() {
        let script = ScriptData {
            values: vec![
                Amf0Value::Null,
                Amf0Value::Number(1.0),
                "onCuePoint".into(),
                Amf0Value::Object(Amf0Object::new()),
                "dangling".into(),
            ],
        };

        let names: Vec<&str> = script.named_values().map(|(name, _)| name).collect();
        assert_eq!(names, ["onCuePoint"]);
        assert_eq!(script.name(), None);
        assert_eq!(script.on_meta_data(), None);
    }

    #[test]
    fn decode_failure() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::String as u8, 0, 2, b'o', b'n',
            Amf0Marker::Reference as u8, 0, 1,
        ];

        let err = ScriptData::demux(&mut ByteCursor::new(&bytes), Amf0DecoderConfig::default()).unwrap_err();
        assert_eq!(err, Amf0Error::UnsupportedMarker(Amf0Marker::Reference));
    }

    #[test]
    fn describe() {
        let bytes = on_meta_data_bytes();
        let script = ScriptData::demux(&mut ByteCursor::new(&bytes), Amf0DecoderConfig::default()).unwrap();

        insta::assert_snapshot!(script.describe(), @r"
        script data (2 values):
            Value String onMetaData
            Value EcmaArray (3 items)
                Elem 'duration' Number 10.0
                Elem 'width' Number 640.0
                Elem 'stereo' Boolean true
        ");
    }
}
