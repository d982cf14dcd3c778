//! Human-readable dumps.

use std::fmt;

use crate::{Amf0Object, Amf0Value};

/// Deterministic, indented, human-readable rendering of a decoded structure.
///
/// Every line ends with a newline. Nested lines are indented by four spaces
/// per `level`. This is for display only, it is never parsed back.
pub trait Describe {
    /// Write the description at the given nesting level.
    ///
    /// The first line is written without indentation, since callers usually
    /// continue a line they already started.
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result;

    /// The description as a string.
    fn describe(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.describe_to(&mut out, 0);
        out
    }
}

/// Write the indentation for `level`.
pub fn write_indent(out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
    for _ in 0..level {
        out.write_str("    ")?;
    }
    Ok(())
}

fn describe_child(value: &Amf0Value, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
    if value.is_complex() {
        value.describe_to(out, level + 1)
    } else {
        value.describe_to(out, 0)
    }
}

fn describe_properties(
    label: &str,
    item: &str,
    properties: &Amf0Object,
    out: &mut dyn fmt::Write,
    level: usize,
) -> fmt::Result {
    writeln!(out, "{label} ({} items)", properties.len())?;

    for (key, value) in properties.iter() {
        write_indent(out, level + 1)?;
        write!(out, "{item} '{key}' ")?;
        describe_child(value, out, level)?;
    }

    Ok(())
}

impl Describe for Amf0Value {
    fn describe_to(&self, out: &mut dyn fmt::Write, level: usize) -> fmt::Result {
        match self {
            Amf0Value::Boolean(v) => writeln!(out, "Boolean {v}"),
            Amf0Value::Number(v) => writeln!(out, "Number {v:?}"),
            Amf0Value::String(v) => writeln!(out, "String {v}"),
            Amf0Value::Date(v) => writeln!(out, "Date {:x}/{:x}", v.millis, v.time_zone),
            Amf0Value::Null => writeln!(out, "Null"),
            Amf0Value::Undefined => writeln!(out, "Undefined"),
            Amf0Value::ObjectEnd => writeln!(out, "ObjectEnd"),
            Amf0Value::Object(o) => describe_properties("Object", "Property", o, out, level),
            Amf0Value::EcmaArray(a) => describe_properties("EcmaArray", "Elem", &a.properties, out, level),
            Amf0Value::StrictArray(a) => {
                writeln!(out, "StrictArray ({} items)", a.len())?;

                for value in a {
                    write_indent(out, level + 1)?;
                    out.write_str("Elem ")?;
                    describe_child(value, out, level)?;
                }

                Ok(())
            }
        }
    }
}
